//! Simulated-annealing refinement of packed solutions.
//!
//! The refiner perturbs a candidate solution with four neighborhood
//! operators (shift, swap, rotate, compact), accepting worsening moves with
//! a probability that decays under a linear cooling schedule. Every
//! operator works on a private clone of the current solution; a rejected or
//! failed move is discarded by dropping the clone, so the accepted state is
//! never partially mutated.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::orientations;
use crate::item::Dims;
use crate::solution::{Placement, Solution};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the annealing loop.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealConfig {
    /// Iteration budget.
    pub max_iterations: u64,
    /// Starting temperature; cools linearly to zero over the budget.
    pub initial_temp: f64,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            initial_temp: 100.0,
        }
    }
}

impl AnnealConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations.max(1);
        self
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(0.0);
        self
    }
}

/// Why the refiner stopped. Diagnostics only, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// The best solution reached the volume lower bound.
    OptimalReached,
    /// No improvement for a tenth of the iteration budget.
    Stalled,
    /// The iteration budget ran out.
    BudgetExhausted,
}

/// The four neighborhood operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Shift,
    Swap,
    Rotate,
    Compact,
}

const OPERATORS: [MoveKind; 4] = [
    MoveKind::Shift,
    MoveKind::Swap,
    MoveKind::Rotate,
    MoveKind::Compact,
];

const OPERATOR_WEIGHTS: [f64; 4] = [0.35, 0.20, 0.25, 0.20];

/// Refines a solution by simulated annealing and returns the best solution
/// found together with the stopping reason.
///
/// Acceptance: improving moves always; worsening moves with probability
/// `exp(-delta / T)` where `T = T0 * (1 - iteration / max_iterations)`, and
/// never once the temperature reaches zero. Stopping conditions are checked
/// once per iteration, lower bound first, then stall, then budget.
pub fn refine<R: Rng>(
    initial: &Solution,
    lower_bound: usize,
    config: &AnnealConfig,
    rng: &mut R,
) -> (Solution, StopReason) {
    let mut current = initial.clone();
    current.trim_empty();
    let mut current_score = current.score();

    let mut best = current.clone();
    let mut best_score = current_score;

    let stall_limit = (config.max_iterations / 10).max(1);
    let mut no_improvement = 0u64;

    let sampler = WeightedIndex::new(OPERATOR_WEIGHTS).expect("static operator weights are valid");

    for iteration in 0..config.max_iterations {
        if best.num_trucks() <= lower_bound {
            log::debug!("iteration {iteration}: lower bound reached, stopping");
            return (best, StopReason::OptimalReached);
        }
        if no_improvement >= stall_limit {
            log::debug!("iteration {iteration}: stalled after {no_improvement} idle iterations");
            return (best, StopReason::Stalled);
        }

        let candidate = match OPERATORS[sampler.sample(rng)] {
            MoveKind::Shift => shift(&current, rng),
            MoveKind::Swap => swap(&current, rng),
            MoveKind::Rotate => rotate(&current, rng),
            MoveKind::Compact => compact(&current, rng),
        };

        let Some(candidate) = candidate else {
            no_improvement += 1;
            continue;
        };

        let new_score = candidate.score();
        let delta = new_score - current_score;
        let temp =
            config.initial_temp * (1.0 - iteration as f64 / config.max_iterations as f64);

        let accept = delta < 0.0 || (temp > 0.0 && rng.gen::<f64>() < (-delta / temp).exp());
        if accept {
            current = candidate;
            current_score = new_score;

            if current_score < best_score {
                best = current.clone();
                best_score = current_score;
                no_improvement = 0;
                log::debug!(
                    "iteration {iteration}: new best score {best_score:.2} with {} trucks",
                    best.num_trucks()
                );
            } else {
                no_improvement += 1;
            }
        } else {
            no_improvement += 1;
        }
    }

    (best, StopReason::BudgetExhausted)
}

/// Returns the indices of trucks that hold at least one item.
fn non_empty_trucks(solution: &Solution) -> Vec<usize> {
    solution
        .trucks()
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_empty())
        .map(|(i, _)| i)
        .collect()
}

/// Checks that removing an item from the truck did not orphan anything
/// resting on it. Removal-based operators bail out on damage instead of
/// returning a solution that violates the gravity rule.
fn still_supported(solution: &Solution, truck_idx: usize) -> bool {
    solution.trucks()[truck_idx].all_supported()
}

/// Shift: re-seat one random placement, in its truck if possible, otherwise
/// into the first other truck that accepts the item.
fn shift<R: Rng>(solution: &Solution, rng: &mut R) -> Option<Solution> {
    let non_empty = non_empty_trucks(solution);
    if non_empty.is_empty() {
        return None;
    }

    let mut sol = solution.clone();
    let ti = non_empty[rng.gen_range(0..non_empty.len())];
    let pi = rng.gen_range(0..sol.trucks()[ti].len());

    let placement = sol.trucks_mut()[ti].remove(pi);
    if !still_supported(&sol, ti) {
        return None;
    }

    let dims = placement.dims();
    if let Some(pos) = sol.trucks()[ti].find_position(dims) {
        sol.trucks_mut()[ti].push(Placement::new(placement.item, pos));
        return Some(sol);
    }

    for tj in 0..sol.num_trucks() {
        if tj == ti {
            continue;
        }
        if sol.trucks_mut()[tj].try_place(placement.item.clone()) {
            sol.trim_empty();
            return Some(sol);
        }
    }
    None
}

/// Swap: exchange one random item between two distinct non-empty trucks.
/// Succeeds only if both re-insertions succeed.
fn swap<R: Rng>(solution: &Solution, rng: &mut R) -> Option<Solution> {
    let non_empty = non_empty_trucks(solution);
    if non_empty.len() < 2 {
        return None;
    }

    let mut sol = solution.clone();
    let a_pick = rng.gen_range(0..non_empty.len());
    let ta = non_empty[a_pick];
    let rest: Vec<usize> = non_empty
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != a_pick)
        .map(|(_, t)| *t)
        .collect();
    let tb = rest[rng.gen_range(0..rest.len())];

    let pa = rng.gen_range(0..sol.trucks()[ta].len());
    let pb = rng.gen_range(0..sol.trucks()[tb].len());

    let item_a = sol.trucks_mut()[ta].remove(pa).item;
    let item_b = sol.trucks_mut()[tb].remove(pb).item;
    if !still_supported(&sol, ta) || !still_supported(&sol, tb) {
        return None;
    }

    if !sol.trucks_mut()[ta].try_place(item_b) {
        return None;
    }
    if !sol.trucks_mut()[tb].try_place(item_a) {
        return None;
    }
    Some(sol)
}

/// Rotate: re-insert one random placement under a different orientation,
/// trying the remaining five in shuffled order.
fn rotate<R: Rng>(solution: &Solution, rng: &mut R) -> Option<Solution> {
    let non_empty = non_empty_trucks(solution);
    if non_empty.is_empty() {
        return None;
    }

    let mut sol = solution.clone();
    let ti = non_empty[rng.gen_range(0..non_empty.len())];
    let pi = rng.gen_range(0..sol.trucks()[ti].len());

    let placement = sol.trucks_mut()[ti].remove(pi);
    if !still_supported(&sol, ti) {
        return None;
    }

    let current = placement.dims();
    let mut alternatives: Vec<Dims> = orientations(&placement.item.original_dims())
        .into_iter()
        .filter(|d| *d != current)
        .collect();
    if alternatives.is_empty() {
        // A cube has nothing to rotate to.
        return None;
    }
    alternatives.shuffle(rng);

    for dims in alternatives {
        if let Some(pos) = sol.trucks()[ti].find_position(dims) {
            let mut item = placement.item.clone();
            item.set_current_dims(dims);
            sol.trucks_mut()[ti].push(Placement::new(item, pos));
            return Some(sol);
        }
    }
    None
}

/// Compact: drop the least-utilized truck and redistribute its entire load
/// over the remaining trucks, all-or-nothing.
fn compact<R: Rng>(solution: &Solution, _rng: &mut R) -> Option<Solution> {
    if solution.num_trucks() < 2 {
        return None;
    }

    let mut sol = solution.clone();

    // Lowest index wins ties, keeping the operator deterministic.
    let mut worst = 0;
    let mut worst_util = sol.trucks()[0].utilization();
    for (i, truck) in sol.trucks().iter().enumerate().skip(1) {
        if truck.utilization() < worst_util {
            worst = i;
            worst_util = truck.utilization();
        }
    }

    let removed = sol.trucks_mut().remove(worst);
    for p in removed.placements() {
        let mut placed = false;
        for truck in sol.trucks_mut().iter_mut() {
            if truck.try_place(p.item.clone()) {
                placed = true;
                break;
            }
        }
        if !placed {
            return None;
        }
    }
    Some(sol)
}
