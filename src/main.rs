//! TSP Annealing Solver - Command Line Interface
//!
//! Solves a Traveling Salesman instance with simulated annealing and reports
//! the tour before and after optimization.

use clap::{Parser, Subcommand};
use tsp_annealing::heuristics::annealing::{AnnealingSchedule, SimulatedAnnealing};
use tsp_annealing::instance::TspInstance;
use tsp_annealing::random::RngSource;
use tsp_annealing::solution::Solution;
use tsp_annealing::visualization::{MapBackground, Visualizer};
use tsp_annealing::{Result, SolverError};

use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "tsp-annealing")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Simulated annealing solver for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a tour over the cities of an instance file
    Solve {
        /// JSON file mapping city names to [x, y]
        #[arg(short, long)]
        cities: PathBuf,

        /// Use only the first N cities of the file
        #[arg(short, long)]
        num_cities: Option<usize>,

        /// Initial temperature
        #[arg(long, default_value = "10000")]
        initial_temp: f64,

        /// Cooling rate applied after each iteration
        #[arg(long, default_value = "0.99")]
        cooling_rate: f64,

        /// Temperature at which the search stops
        #[arg(long, default_value = "0.00001")]
        min_temp: f64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Wall-clock budget in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,

        /// Output solution to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG drawing of the optimized tour
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Background map image referenced by the SVG
        #[arg(long, requires = "svg")]
        background: Option<String>,

        /// Background image width in pixels
        #[arg(long, default_value = "1100")]
        map_width: f64,

        /// Background image height in pixels
        #[arg(long, default_value = "700")]
        map_height: f64,

        /// Write the per-iteration trace as CSV
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// JSON file mapping city names to [x, y]
        #[arg(short, long)]
        cities: PathBuf,

        /// Use only the first N cities of the file
        #[arg(short, long)]
        num_cities: Option<usize>,
    },
}

struct SolveOptions {
    num_cities: Option<usize>,
    schedule: AnnealingSchedule,
    seed: u64,
    time_limit: Option<f64>,
    output: Option<PathBuf>,
    svg: Option<PathBuf>,
    background: Option<MapBackground>,
    trace: Option<PathBuf>,
    verbose: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            cities,
            num_cities,
            initial_temp,
            cooling_rate,
            min_temp,
            seed,
            time_limit,
            output,
            svg,
            background,
            map_width,
            map_height,
            trace,
            verbose,
        } => {
            let options = SolveOptions {
                num_cities,
                schedule: AnnealingSchedule::with_params(initial_temp, min_temp, cooling_rate),
                seed,
                time_limit,
                output,
                svg,
                background: background.map(|href| MapBackground::new(href, map_width, map_height)),
                trace,
                verbose,
            };
            solve_instance(&cities, options)
        }

        Commands::Analyze { cities, num_cities } => analyze_instance(&cities, num_cities),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_instance(path: &Path, num_cities: Option<usize>) -> Result<TspInstance> {
    println!("Loading instance from {:?}...", path);
    let instance = TspInstance::from_file(path)?;
    match num_cities {
        Some(n) => instance.truncated(n),
        None => Ok(instance),
    }
}

fn solve_instance(path: &Path, options: SolveOptions) -> Result<()> {
    let instance = load_instance(path, options.num_cities)?;
    let initial = instance.initial_tour()?;
    let starting_city = instance
        .starting_city()
        .ok_or_else(|| SolverError::invalid_input("instance contains no cities"))?;

    if options.verbose {
        println!("{}", instance.statistics());
        println!("Initial tour: {:?}", initial.names());
    }
    println!("Initial path value: {:.2}", initial.cost());
    println!("{} Miles before optimization", initial.cost());

    let mut sa = SimulatedAnnealing::with_schedule(options.schedule);
    sa.time_limit = options
        .time_limit
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| SolverError::invalid_input(format!("invalid time limit {}: {}", secs, e)))
        })
        .transpose()?;
    sa.record_steps = options.trace.is_some();

    println!("Solving with simulated annealing ({} iterations)...", options.schedule.iteration_count()?);
    let mut rng = RngSource::seeded(options.seed);
    let outcome = sa.run(initial, &mut rng)?;
    let solution = Solution::from_outcome(&outcome, options.schedule, Some(options.seed), sa.name());

    println!("\n========== Results ==========");
    println!("Final path length: {:.2}", solution.cost);
    println!("{} Miles after optimization", solution.cost);
    println!("Improvement: {:.2}", solution.improvement());
    println!("Iterations: {}", solution.iterations);
    println!("Time: {:.4}s", solution.computation_time);
    if outcome.stats.stopped_by_time_limit {
        println!("Stopped by time limit");
    }

    if options.verbose {
        println!("\nTour: {:?}", solution.tour);
        println!(
            "Moves: {} improving, {} accepted, {} rejected (acceptance rate {:.2}%)",
            outcome.stats.improving_moves,
            outcome.stats.accepted_moves,
            outcome.stats.rejected_moves,
            outcome.stats.acceptance_rate() * 100.0
        );
    }

    if let Some(out_path) = options.output {
        solution.save_json(&out_path)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if let Some(trace_path) = options.trace {
        outcome.export_steps_csv(&trace_path)?;
        println!("Trace saved to {:?}", trace_path);
    }

    if let Some(svg_path) = options.svg {
        let viz = match options.background {
            Some(bg) => Visualizer::with_background(bg),
            None => Visualizer::new(),
        };
        let caption = format!("{} Miles after optimization", solution.cost as i64);
        let svg = viz.generate_svg(&outcome.best, starting_city, &caption);
        viz.save_svg(&svg, &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);
    }

    Ok(())
}

fn analyze_instance(path: &Path, num_cities: Option<usize>) -> Result<()> {
    let instance = load_instance(path, num_cities)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let schedule = AnnealingSchedule::default();
    println!("Default schedule:");
    println!(
        "  T0 = {}, alpha = {}, Tmin = {}",
        schedule.initial_temp, schedule.cooling_rate, schedule.final_temp
    );
    println!("  Iterations: {}", schedule.iteration_count()?);

    Ok(())
}
