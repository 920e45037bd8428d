//! Error types for truckpack.

use thiserror::Error;

/// Result type alias for truckpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading instances or solving.
///
/// Infeasibility is not an error: an instance whose items cannot fit the
/// truck envelope yields the `Unsat` outcome, not an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed instance text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid item definition.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid truck envelope.
    #[error("Invalid truck: {0}")]
    InvalidTruck(String),

    /// A solution violated one of the packing invariants.
    #[error("Invalid solution: {0}")]
    InvalidSolution(String),
}
