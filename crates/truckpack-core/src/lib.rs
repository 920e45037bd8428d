//! # Truckpack Core
//!
//! A 3D truck-loading solver: packs rectangular items into the minimum
//! number of identical trucks under axis-aligned rotation and a gravity
//! support rule.
//!
//! The pipeline is a feasibility pre-check, a volume lower bound, a
//! multi-start first-fit construction over a portfolio of item orderings,
//! and a simulated-annealing refinement phase. Everything is deterministic
//! for a fixed configuration: all randomness derives from explicit seeds.
//!
//! ## Core Components
//!
//! - **Model**: `Dims`, `Item`, `Position`, `Placement`, `Truck`, `Solution`
//! - **Geometry**: orientation enumeration, collision and support tests
//! - **Engines**: `first_fit` construction, `refine` annealing
//! - **Orchestration**: `TruckPacker` with sequential and parallel solves
//! - **I/O**: plain-text instance and solution codecs
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod anneal;
pub mod bound;
pub mod error;
pub mod geometry;
pub mod greedy;
pub mod io;
pub mod item;
pub mod report;
pub mod solution;
pub mod solver;

// Re-exports
pub use anneal::{refine, AnnealConfig, StopReason};
pub use bound::{all_items_fit, lower_bound};
pub use error::{Error, Result};
pub use greedy::first_fit;
pub use io::{format_outcome, parse_instance};
pub use item::{Dims, Item};
pub use report::{SolveOutcome, SolveReport, StrategyReport};
pub use solution::{Placement, Position, Solution, Truck};
pub use solver::{OrderingStrategy, SolverConfig, TruckPacker};
