//! Multi-start solve orchestration.
//!
//! The orchestrator expands a portfolio of item orderings, runs first-fit
//! on each, optionally hands the result to the annealing refiner, and keeps
//! the best-scoring solution. All randomness flows through seeds derived
//! from `seed_start`, so a given configuration always produces the same
//! answer, sequentially or in parallel.

use std::cmp::Reverse;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::anneal::{refine, AnnealConfig, StopReason};
use crate::bound::{all_items_fit, lower_bound};
use crate::greedy::first_fit;
use crate::item::{Dims, Item};
use crate::report::{SolveOutcome, SolveReport, StrategyReport};
use crate::solution::Solution;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the greedy pass orders items before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderingStrategy {
    /// Largest volume first (first-fit-decreasing).
    VolumeDesc,
    /// Smallest volume first.
    VolumeAsc,
    /// Seeded shuffle; expands into `num_random_starts` portfolio entries.
    Random,
}

/// Solver configuration with builder-style setters.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Ordering portfolio; `Random` expands into `num_random_starts` runs.
    pub strategies: Vec<OrderingStrategy>,
    /// Base seed for all derived RNGs.
    pub seed_start: u64,
    /// Number of shuffled runs each `Random` entry expands into.
    pub num_random_starts: usize,
    /// Iteration budget of the refiner, per strategy.
    pub max_iterations: u64,
    /// Initial annealing temperature.
    pub initial_temp: f64,
    /// Whether to refine greedy solutions at all.
    pub refine: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategies: vec![
                OrderingStrategy::VolumeDesc,
                OrderingStrategy::VolumeAsc,
                OrderingStrategy::Random,
            ],
            seed_start: 42,
            num_random_starts: 5,
            max_iterations: 2000,
            initial_temp: 100.0,
            refine: true,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ordering portfolio.
    pub fn with_strategies(mut self, strategies: Vec<OrderingStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets the base seed.
    pub fn with_seed_start(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Sets the number of random starts.
    pub fn with_num_random_starts(mut self, starts: usize) -> Self {
        self.num_random_starts = starts;
        self
    }

    /// Sets the refiner iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations.max(1);
        self
    }

    /// Sets the initial annealing temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(0.0);
        self
    }

    /// Enables or disables refinement.
    pub fn with_refine(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }
}

/// One expanded portfolio entry with its derived seeds.
struct StrategyRun {
    label: String,
    strategy: OrderingStrategy,
    shuffle_seed: Option<u64>,
    refine_seed: u64,
}

/// The truck-loading solver.
#[derive(Debug, Clone, Default)]
pub struct TruckPacker {
    config: SolverConfig,
}

impl TruckPacker {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves the instance, running the portfolio sequentially.
    ///
    /// Stops early once a strategy matches the volume lower bound; later
    /// strategies cannot beat it on truck count, and the score makes truck
    /// count dominate.
    pub fn solve(&self, truck_dims: Dims, items: &[Item]) -> Result<SolveReport> {
        let start = Instant::now();
        let lb = self.preflight(truck_dims, items)?;

        if items.is_empty() {
            return Ok(self.empty_report(start));
        }
        if !all_items_fit(truck_dims, items) {
            log::info!("an item fits the truck envelope in no orientation; UNSAT");
            return Ok(SolveReport::unsat(lb, start.elapsed().as_millis() as u64));
        }

        let runs = self.portfolio();
        let mut best: Option<(Solution, f64, String)> = None;
        let mut strategies = Vec::new();

        for run in &runs {
            let Some((solution, score, reason)) = self.run_one(run, truck_dims, items, lb)
            else {
                continue;
            };
            log::info!(
                "strategy {}: {} trucks, score {:.2}",
                run.label,
                solution.num_trucks(),
                score
            );
            strategies.push(StrategyReport {
                label: run.label.clone(),
                score,
                trucks: solution.num_trucks(),
                stop_reason: reason,
            });

            if best.as_ref().map_or(true, |(_, s, _)| score < *s) {
                best = Some((solution, score, run.label.clone()));
            }
            if let Some((s, _, _)) = &best {
                if s.num_trucks() <= lb {
                    log::info!("lower bound {lb} reached, skipping remaining strategies");
                    break;
                }
            }
        }

        self.finish(best, lb, strategies, start)
    }

    /// Solves the instance, running the whole portfolio in parallel.
    ///
    /// No early stop; every strategy runs and the best by `(score, portfolio
    /// index)` wins, so the answer matches `solve` whenever `solve` does not
    /// stop early, and is never worse.
    pub fn solve_parallel(&self, truck_dims: Dims, items: &[Item]) -> Result<SolveReport> {
        let start = Instant::now();
        let lb = self.preflight(truck_dims, items)?;

        if items.is_empty() {
            return Ok(self.empty_report(start));
        }
        if !all_items_fit(truck_dims, items) {
            log::info!("an item fits the truck envelope in no orientation; UNSAT");
            return Ok(SolveReport::unsat(lb, start.elapsed().as_millis() as u64));
        }

        let runs = self.portfolio();
        let results: Vec<(usize, Solution, f64, StrategyReport)> = runs
            .par_iter()
            .enumerate()
            .filter_map(|(idx, run)| {
                self.run_one(run, truck_dims, items, lb)
                    .map(|(solution, score, reason)| {
                        let report = StrategyReport {
                            label: run.label.clone(),
                            score,
                            trucks: solution.num_trucks(),
                            stop_reason: reason,
                        };
                        (idx, solution, score, report)
                    })
            })
            .collect();

        let mut best: Option<(Solution, f64, String)> = None;
        let mut strategies = Vec::with_capacity(results.len());
        for (idx, solution, score, report) in results {
            log::info!(
                "strategy {}: {} trucks, score {:.2}",
                runs[idx].label,
                solution.num_trucks(),
                score
            );
            strategies.push(report);
            if best.as_ref().map_or(true, |(_, s, _)| score < *s) {
                best = Some((solution, score, runs[idx].label.clone()));
            }
        }

        self.finish(best, lb, strategies, start)
    }

    /// Validates the instance and returns its lower bound.
    fn preflight(&self, truck_dims: Dims, items: &[Item]) -> Result<usize> {
        truck_dims.validate().map_err(|_| {
            Error::InvalidTruck(format!(
                "all truck dimensions must be positive, got {}x{}x{}",
                truck_dims.length, truck_dims.width, truck_dims.height
            ))
        })?;
        for item in items {
            item.validate()?;
        }
        Ok(lower_bound(truck_dims, items))
    }

    fn empty_report(&self, start: Instant) -> SolveReport {
        SolveReport {
            outcome: SolveOutcome::Sat(Solution::new()),
            lower_bound: 0,
            best_score: None,
            strategy: None,
            strategies: Vec::new(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn finish(
        &self,
        best: Option<(Solution, f64, String)>,
        lb: usize,
        strategies: Vec<StrategyReport>,
        start: Instant,
    ) -> Result<SolveReport> {
        let Some((mut solution, score, label)) = best else {
            log::info!("no strategy produced a solution; UNSAT");
            return Ok(SolveReport::unsat(lb, start.elapsed().as_millis() as u64));
        };
        solution.trim_empty();
        log::info!(
            "best: {} trucks (lower bound {lb}), score {score:.2}, strategy {label}",
            solution.num_trucks()
        );
        Ok(SolveReport {
            outcome: SolveOutcome::Sat(solution),
            lower_bound: lb,
            best_score: Some(score),
            strategy: Some(label),
            strategies,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Expands the configured strategies into concrete runs.
    ///
    /// Each `Random` entry becomes `num_random_starts` runs; random start
    /// `i` shuffles with seed `seed_start + i` and refines with that seed
    /// plus 1000. Deterministic runs need no shuffle seed and refine with
    /// `seed_start + 1000 + portfolio index`.
    fn portfolio(&self) -> Vec<StrategyRun> {
        let mut runs = Vec::new();
        let mut random_idx = 0u64;

        for strategy in &self.config.strategies {
            match strategy {
                OrderingStrategy::Random => {
                    for _ in 0..self.config.num_random_starts {
                        let shuffle_seed = self.config.seed_start + random_idx;
                        runs.push(StrategyRun {
                            label: format!("random#{random_idx}"),
                            strategy: *strategy,
                            shuffle_seed: Some(shuffle_seed),
                            refine_seed: shuffle_seed + 1000,
                        });
                        random_idx += 1;
                    }
                }
                OrderingStrategy::VolumeDesc | OrderingStrategy::VolumeAsc => {
                    let label = match strategy {
                        OrderingStrategy::VolumeDesc => "volume-desc",
                        _ => "volume-asc",
                    };
                    runs.push(StrategyRun {
                        label: label.to_string(),
                        strategy: *strategy,
                        shuffle_seed: None,
                        refine_seed: self.config.seed_start + 1000 + runs.len() as u64,
                    });
                }
            }
        }
        runs
    }

    /// Runs one portfolio entry: order, pack, optionally refine.
    fn run_one(
        &self,
        run: &StrategyRun,
        truck_dims: Dims,
        items: &[Item],
        lb: usize,
    ) -> Option<(Solution, f64, Option<StopReason>)> {
        let mut ordered = items.to_vec();
        match run.strategy {
            OrderingStrategy::VolumeDesc => ordered.sort_by_key(|it| Reverse(it.volume())),
            OrderingStrategy::VolumeAsc => ordered.sort_by_key(Item::volume),
            OrderingStrategy::Random => {
                let seed = run.shuffle_seed.unwrap_or(self.config.seed_start);
                let mut rng = StdRng::seed_from_u64(seed);
                ordered.shuffle(&mut rng);
            }
        }

        let initial = first_fit(truck_dims, &ordered)?;
        if !self.config.refine {
            let score = initial.score();
            return Some((initial, score, None));
        }

        let config = AnnealConfig {
            max_iterations: self.config.max_iterations,
            initial_temp: self.config.initial_temp,
        };
        let mut rng = StdRng::seed_from_u64(run.refine_seed);
        let (refined, reason) = refine(&initial, lb, &config, &mut rng);
        let score = refined.score();
        Some((refined, score, Some(reason)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Position;

    fn item(id: usize, l: i64, w: i64, h: i64) -> Item {
        Item::new(id, Dims::new(l, w, h))
    }

    fn quick_config() -> SolverConfig {
        SolverConfig::default()
            .with_max_iterations(200)
            .with_num_random_starts(2)
    }

    #[test]
    fn test_solve_single_item() {
        let packer = TruckPacker::new(quick_config());
        let report = packer
            .solve(Dims::new(100, 100, 100), &[item(0, 50, 50, 50)])
            .unwrap();

        assert!(report.is_sat());
        assert_eq!(report.num_trucks(), 1);
        assert!(report.is_provably_optimal());
        let solution = report.outcome.solution().unwrap();
        assert_eq!(
            solution.trucks()[0].placements()[0].position,
            Position::new(0, 0, 0)
        );
    }

    #[test]
    fn test_solve_unsat_when_item_cannot_fit() {
        let packer = TruckPacker::new(quick_config());
        let report = packer
            .solve(Dims::new(10, 10, 10), &[item(0, 20, 10, 10)])
            .unwrap();
        assert!(!report.is_sat());
        assert!(report.best_score.is_none());
        assert!(report.strategies.is_empty());
    }

    #[test]
    fn test_solve_empty_instance() {
        let packer = TruckPacker::new(quick_config());
        let report = packer.solve(Dims::new(10, 10, 10), &[]).unwrap();
        assert!(report.is_sat());
        assert_eq!(report.num_trucks(), 0);
        assert_eq!(report.lower_bound, 0);
    }

    #[test]
    fn test_solve_rejects_bad_truck() {
        let packer = TruckPacker::new(quick_config());
        assert!(packer.solve(Dims::new(0, 10, 10), &[]).is_err());
    }

    #[test]
    fn test_solve_rejects_bad_item() {
        let packer = TruckPacker::new(quick_config());
        let result = packer.solve(Dims::new(10, 10, 10), &[item(0, -1, 5, 5)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_solve_result_validates() {
        let truck = Dims::new(30, 30, 30);
        let items: Vec<Item> = (0..10)
            .map(|id| item(id, 10 + (id as i64 % 2) * 5, 10, 15))
            .collect();
        let packer = TruckPacker::new(quick_config());
        let report = packer.solve(truck, &items).unwrap();
        let solution = report.outcome.solution().unwrap();
        assert!(solution.validate(truck, &items).is_ok());
    }

    #[test]
    fn test_solve_is_deterministic() {
        let truck = Dims::new(40, 40, 40);
        let items: Vec<Item> = (0..12)
            .map(|id| item(id, 10 + (id as i64 % 3) * 5, 10, 20))
            .collect();
        let packer = TruckPacker::new(quick_config());

        let a = packer.solve(truck, &items).unwrap();
        let b = packer.solve(truck, &items).unwrap();
        assert_eq!(a.best_score, b.best_score);
        assert_eq!(a.strategy, b.strategy);

        let sa = a.outcome.solution().unwrap();
        let sb = b.outcome.solution().unwrap();
        assert_eq!(sa.num_trucks(), sb.num_trucks());
        for (ta, tb) in sa.trucks().iter().zip(sb.trucks()) {
            for (pa, pb) in ta.placements().iter().zip(tb.placements()) {
                assert_eq!(pa.item.id(), pb.item.id());
                assert_eq!(pa.position, pb.position);
                assert_eq!(pa.dims(), pb.dims());
            }
        }
    }

    #[test]
    fn test_parallel_is_no_worse_than_sequential() {
        let truck = Dims::new(30, 30, 30);
        let items: Vec<Item> = (0..9)
            .map(|id| item(id, 10, 10 + (id as i64 % 2) * 5, 15))
            .collect();
        let packer = TruckPacker::new(quick_config());

        let seq = packer.solve(truck, &items).unwrap();
        let par = packer.solve_parallel(truck, &items).unwrap();
        assert!(par.is_sat() && seq.is_sat());
        assert!(par.best_score.unwrap() <= seq.best_score.unwrap());
        let solution = par.outcome.solution().unwrap();
        assert!(solution.validate(truck, &items).is_ok());
    }

    #[test]
    fn test_empty_portfolio_is_unsat() {
        let packer = TruckPacker::new(quick_config().with_strategies(vec![]));
        let report = packer
            .solve(Dims::new(10, 10, 10), &[item(0, 5, 5, 5)])
            .unwrap();
        assert!(!report.is_sat());
        assert_eq!(report.lower_bound, 1);
        assert!(report.strategies.is_empty());
    }

    #[test]
    fn test_no_refine_skips_stop_reasons() {
        let packer = TruckPacker::new(quick_config().with_refine(false));
        let report = packer
            .solve(Dims::new(20, 20, 20), &[item(0, 10, 10, 10), item(1, 10, 10, 10)])
            .unwrap();
        assert!(report.is_sat());
        assert!(report.strategies.iter().all(|s| s.stop_reason.is_none()));
    }

    #[test]
    fn test_portfolio_expands_random_starts() {
        let config = SolverConfig::default().with_num_random_starts(3);
        let packer = TruckPacker::new(config);
        let runs = packer.portfolio();
        assert_eq!(runs.len(), 5);
        assert_eq!(runs[0].label, "volume-desc");
        assert_eq!(runs[1].label, "volume-asc");
        assert_eq!(runs[2].label, "random#0");
        assert_eq!(runs[4].label, "random#2");
        assert_eq!(runs[2].shuffle_seed, Some(42));
        assert_eq!(runs[4].shuffle_seed, Some(44));
    }
}
