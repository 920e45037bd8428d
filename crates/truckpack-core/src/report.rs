//! Solve outcome and reporting types.

use crate::anneal::StopReason;
use crate::solution::Solution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Final answer of a solve: either a feasible packing or proof-by-precheck
/// that none exists.
///
/// `Unsat` is a value, not an error; it means some item fits the truck
/// envelope in no orientation. An empty instance is `Sat` with zero trucks.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolveOutcome {
    /// A feasible packing of every item.
    Sat(Solution),
    /// No packing exists.
    Unsat,
}

impl SolveOutcome {
    /// Returns true if a packing was found.
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveOutcome::Sat(_))
    }

    /// Returns the packing, if any.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Sat(solution) => Some(solution),
            SolveOutcome::Unsat => None,
        }
    }
}

/// Per-strategy diagnostics from one multi-start run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrategyReport {
    /// Strategy label, e.g. `"volume-desc"` or `"random#3"`.
    pub label: String,
    /// Score of the strategy's final solution.
    pub score: f64,
    /// Trucks used by the strategy's final solution.
    pub trucks: usize,
    /// Why the refiner stopped; `None` when refinement was disabled or the
    /// strategy was skipped by the early-stop check.
    pub stop_reason: Option<StopReason>,
}

/// Result of a full solve: the outcome plus everything a caller needs to
/// judge it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveReport {
    /// The packing, or `Unsat`.
    pub outcome: SolveOutcome,
    /// Volume lower bound on the number of trucks.
    pub lower_bound: usize,
    /// Score of the best solution; `None` for `Unsat`.
    pub best_score: Option<f64>,
    /// Label of the winning strategy; `None` for `Unsat` or empty instances.
    pub strategy: Option<String>,
    /// Diagnostics for every strategy that actually ran.
    pub strategies: Vec<StrategyReport>,
    /// Wall-clock solve time in milliseconds.
    pub elapsed_ms: u64,
}

impl SolveReport {
    /// Creates an `Unsat` report.
    pub fn unsat(lower_bound: usize, elapsed_ms: u64) -> Self {
        Self {
            outcome: SolveOutcome::Unsat,
            lower_bound,
            best_score: None,
            strategy: None,
            strategies: Vec::new(),
            elapsed_ms,
        }
    }

    /// Returns true if a packing was found.
    pub fn is_sat(&self) -> bool {
        self.outcome.is_sat()
    }

    /// Returns the number of trucks in the packing, or zero for `Unsat`.
    pub fn num_trucks(&self) -> usize {
        self.outcome.solution().map_or(0, Solution::num_trucks)
    }

    /// Returns true if the packing matches the volume lower bound, which
    /// proves it uses the minimum possible number of trucks.
    pub fn is_provably_optimal(&self) -> bool {
        self.is_sat() && self.num_trucks() <= self.lower_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Dims, Item};

    #[test]
    fn test_unsat_report() {
        let report = SolveReport::unsat(1, 3);
        assert!(!report.is_sat());
        assert_eq!(report.num_trucks(), 0);
        assert!(report.best_score.is_none());
        assert!(!report.is_provably_optimal());
    }

    #[test]
    fn test_sat_report() {
        let mut solution = Solution::new();
        let dims = Dims::new(10, 10, 10);
        let t = solution.open_truck(dims);
        assert!(solution.trucks_mut()[t].try_place(Item::new(0, Dims::new(5, 5, 5))));
        let score = solution.score();

        let report = SolveReport {
            outcome: SolveOutcome::Sat(solution),
            lower_bound: 1,
            best_score: Some(score),
            strategy: Some("volume-desc".to_string()),
            strategies: Vec::new(),
            elapsed_ms: 0,
        };
        assert!(report.is_sat());
        assert_eq!(report.num_trucks(), 1);
        assert!(report.is_provably_optimal());
    }

    #[test]
    fn test_empty_sat_is_not_optimal_claim() {
        let report = SolveReport {
            outcome: SolveOutcome::Sat(Solution::new()),
            lower_bound: 0,
            best_score: Some(f64::INFINITY),
            strategy: None,
            strategies: Vec::new(),
            elapsed_ms: 0,
        };
        assert!(report.is_sat());
        assert_eq!(report.num_trucks(), 0);
        assert!(report.is_provably_optimal());
    }
}
