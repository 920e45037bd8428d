//! Truckpack CLI
//!
//! Solves truck-loading instances from their text form and generates
//! random instances compatible with the solver's input format.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use truckpack_core::{format_outcome, parse_instance, OrderingStrategy, SolverConfig, TruckPacker};

#[derive(Parser)]
#[command(name = "truckpack")]
#[command(about = "3D truck-loading solver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a loading instance
    Solve {
        /// Path to the instance file
        file: PathBuf,

        /// Number of shuffled restarts
        #[arg(short, long, default_value = "5")]
        starts: usize,

        /// Refiner iteration budget per strategy
        #[arg(short, long, default_value = "2000")]
        iterations: u64,

        /// Initial annealing temperature
        #[arg(short, long, default_value = "100.0")]
        temperature: f64,

        /// Base random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Skip the annealing refinement phase
        #[arg(long)]
        no_refine: bool,

        /// Run the strategy portfolio on all cores
        #[arg(short, long)]
        parallel: bool,

        /// Write the solution here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a random instance
    Generate {
        /// Instance size preset
        #[arg(short, long, value_enum, default_value = "bronze")]
        league: League,

        /// Generator seed
        #[arg(long, default_value = "42")]
        seed: u32,

        /// Write the instance here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum League {
    /// Up to 10 items, no delivery orders
    Bronze,
    /// Up to 100 items, no delivery orders
    Silver,
    /// Up to 1000 items, delivery orders up to 1000
    Gold,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            starts,
            iterations,
            temperature,
            seed,
            no_refine,
            parallel,
            output,
        } => {
            let input = fs::read_to_string(&file)
                .with_context(|| format!("cannot read instance file {}", file.display()))?;
            let (truck_dims, items) = parse_instance(&input)?;
            log::info!(
                "instance: truck {}x{}x{}, {} items",
                truck_dims.length,
                truck_dims.width,
                truck_dims.height,
                items.len()
            );

            let config = SolverConfig::default()
                .with_strategies(vec![
                    OrderingStrategy::VolumeDesc,
                    OrderingStrategy::VolumeAsc,
                    OrderingStrategy::Random,
                ])
                .with_num_random_starts(starts)
                .with_max_iterations(iterations)
                .with_initial_temp(temperature)
                .with_seed_start(seed)
                .with_refine(!no_refine);
            let packer = TruckPacker::new(config);

            let report = if parallel {
                packer.solve_parallel(truck_dims, &items)?
            } else {
                packer.solve(truck_dims, &items)?
            };

            if let Some(solution) = report.outcome.solution() {
                solution.validate(truck_dims, &items)?;
                log::info!(
                    "{} trucks (lower bound {}), average utilization {:.1}%, {} ms",
                    report.num_trucks(),
                    report.lower_bound,
                    solution.average_utilization(),
                    report.elapsed_ms
                );
            } else {
                log::info!("instance is UNSAT ({} ms)", report.elapsed_ms);
            }

            emit(output, format_outcome(&report.outcome))
        }

        Commands::Generate {
            league,
            seed,
            output,
        } => emit(output, generate_instance(league, seed)),
    }
}

fn emit(output: Option<PathBuf>, text: String) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(&path, text)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}

/// 32-bit linear congruential generator used by the instance generator.
///
/// Emits the upper halfword of the state, so successive values stay in
/// `0..65536`.
struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = 0xadb4_a92d_u32.wrapping_mul(self.state).wrapping_add(9_999_999);
        self.state >> 16
    }

    /// Uniform-ish draw in `[min, max)`.
    fn range(&mut self, min: i64, max: i64) -> i64 {
        min + i64::from(self.next()) % (max - min)
    }

    /// Draw in `[min, max]` rounded down to a multiple of 10.
    fn dimension(&mut self, min: i64, max: i64) -> i64 {
        self.range(min, max + 1) / 10 * 10
    }
}

fn generate_instance(league: League, seed: u32) -> String {
    let mut rng = Lcg::new(seed);
    let (max_items, max_delivery) = match league {
        League::Bronze => (10, -1),
        League::Silver => (100, -1),
        League::Gold => (1000, 1000),
    };

    let truck_l = rng.dimension(20, 400);
    let truck_w = rng.dimension(20, 210);
    let truck_h = rng.dimension(20, 220);
    let mut out = format!("{truck_l} {truck_w} {truck_h}\n");

    let count = rng.range(1, max_items + 1);
    out.push_str(&format!("{count}\n"));
    for _ in 0..count {
        let l = rng.dimension(10, 500);
        let w = rng.dimension(10, 500);
        let h = rng.dimension(10, 500);
        let order = rng.range(-1, max_delivery + 1);
        out.push_str(&format!("{l} {w} {h} {order}\n"));
    }
    out
}
