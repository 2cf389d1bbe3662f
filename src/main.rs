//! Mall Walking-Tour Solver - Command Line Interface
//!
//! Generates multi-floor mall layouts and plans short walking tours
//! through them.

use clap::{Parser, Subcommand};
use mall_tour_solver::benchmark::{Benchmark, BenchmarkConfig};
use mall_tour_solver::mall::{Mall, DEFAULT_FLOOR_PENALTY};
use mall_tour_solver::planner::plan_tour;
use mall_tour_solver::visualization::Visualizer;

use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "mall-tour-solver")]
#[command(version = "1.0")]
#[command(about = "Plans short walking tours through multi-floor mall layouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random mall layout and save it as JSON
    Generate {
        /// Number of floors
        #[arg(short, long, default_value = "3")]
        floors: u32,

        /// Shops per floor
        #[arg(short, long, default_value = "5")]
        shops_per_floor: u32,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output layout file
        #[arg(short, long, default_value = "mall_coordinates.json")]
        output: PathBuf,
    },

    /// Plan a walking tour through a layout
    Solve {
        /// Layout file; generated on the fly when missing
        #[arg(short, long, default_value = "mall_coordinates.json")]
        layout: PathBuf,

        /// Start shop (name or index)
        #[arg(long, default_value = "0")]
        start: String,

        /// End shop (name or index); defaults to the last shop, or the
        /// first when the start is already the last
        #[arg(long)]
        end: Option<String>,

        /// Floor-change penalty
        #[arg(short, long, default_value_t = DEFAULT_FLOOR_PENALTY)]
        penalty: f64,

        /// Random seed for on-the-fly generation
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Write the solved tour as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG rendering of the tour
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Write a PNG rendering of the tour (uses the native renderer when
        /// built with the resvg feature, external converters otherwise)
        #[arg(long)]
        png: Option<PathBuf>,

        /// Print per-phase costs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print statistics about a layout
    Analyze {
        /// Layout file
        #[arg(short, long, default_value = "mall_coordinates.json")]
        layout: PathBuf,

        /// Floor-change penalty
        #[arg(short, long, default_value_t = DEFAULT_FLOOR_PENALTY)]
        penalty: f64,
    },

    /// Benchmark construction vs refinement over random malls
    Bench {
        /// Number of random malls
        #[arg(short, long, default_value = "20")]
        runs: usize,

        /// Number of floors per mall
        #[arg(short, long, default_value = "3")]
        floors: u32,

        /// Shops per floor
        #[arg(short, long, default_value = "10")]
        shops_per_floor: u32,

        /// Floor-change penalty
        #[arg(short, long, default_value_t = DEFAULT_FLOOR_PENALTY)]
        penalty: f64,

        /// Seed of the first mall
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output directory for CSV results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { floors, shops_per_floor, seed, output } => {
            generate_layout(floors, shops_per_floor, seed, &output);
        }
        Commands::Solve { layout, start, end, penalty, seed, output, svg, png, verbose } => {
            solve_layout(&layout, &start, end.as_deref(), penalty, seed, output, svg, png, verbose);
        }
        Commands::Analyze { layout, penalty } => {
            analyze_layout(&layout, penalty);
        }
        Commands::Bench { runs, floors, shops_per_floor, penalty, seed, output } => {
            run_benchmark(runs, floors, shops_per_floor, penalty, seed, &output);
        }
    }
}

fn generate_layout(floors: u32, shops_per_floor: u32, seed: u64, output: &PathBuf) {
    let mall = Mall::generate(floors, shops_per_floor, DEFAULT_FLOOR_PENALTY, seed);
    if let Err(e) = mall.save(output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    println!("Saved {} shops on {} floors to {}", mall.len(), floors, output.display());
}

/// Resolve a shop argument given either as a name or as a numeric index.
fn resolve_shop(mall: &Mall, arg: &str) -> usize {
    if let Ok(index) = arg.parse::<usize>() {
        return index;
    }
    match mall.index_of(arg) {
        Some(index) => index,
        None => {
            eprintln!("Error: no shop named '{}'", arg);
            process::exit(1);
        }
    }
}

/// Default end shop when none is given: the last shop, unless the start
/// already is the last shop, in which case the first. Keeps the default
/// from tripping the start-equals-end validation.
fn default_end(mall_len: usize, start: usize) -> usize {
    let last = mall_len.saturating_sub(1);
    if start == last {
        0
    } else {
        last
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_layout(
    layout: &PathBuf,
    start: &str,
    end: Option<&str>,
    penalty: f64,
    seed: u64,
    output: Option<PathBuf>,
    svg: Option<PathBuf>,
    png: Option<PathBuf>,
    verbose: bool,
) {
    let mall = match Mall::load_or_generate(layout, 3, 5, penalty, seed) {
        Ok(mall) => mall,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let start_idx = resolve_shop(&mall, start);
    let end_idx = match end {
        Some(arg) => resolve_shop(&mall, arg),
        None => default_end(mall.len(), start_idx),
    };

    let tour = match plan_tour(&mall, start_idx, end_idx) {
        Ok(tour) => tour,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if verbose {
        match mall_tour_solver::benchmark::compare_phases(&mall, start_idx, end_idx) {
            Ok((constructed, refined)) => {
                println!("Construction cost: {:.2}", constructed);
                println!("Refined cost:      {:.2}", refined);
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!("Total walking cost: {:.2}", tour.cost);
    println!("Visiting order:");
    for &i in &tour.order {
        let shop = &mall.shops[i];
        println!("  {} (floor {}, {:.1}, {:.1})", shop.name, shop.floor, shop.x, shop.y);
    }

    if let Some(path) = output {
        match serde_json::to_string_pretty(&tour) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    eprintln!("Error writing tour: {}", e);
                } else {
                    println!("Tour saved to {}", path.display());
                }
            }
            Err(e) => eprintln!("Error serializing tour: {}", e),
        }
    }

    if svg.is_some() || png.is_some() {
        let viz = Visualizer::new();
        let svg_doc = viz.generate_svg(&mall, &tour);
        if let Some(path) = svg {
            if let Err(e) = viz.save_svg(&svg_doc, &path) {
                eprintln!("Error writing SVG: {}", e);
            } else {
                println!("SVG saved to {}", path.display());
            }
        }
        if let Some(path) = png {
            if let Err(e) = viz.save_png(&svg_doc, &path) {
                eprintln!("Error writing PNG: {}", e);
            } else {
                println!("PNG saved to {}", path.display());
            }
        }
    }
}

fn analyze_layout(layout: &PathBuf, penalty: f64) {
    let mall = match Mall::from_file(layout, penalty) {
        Ok(mall) => mall,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    print!("{}", mall.statistics());
}

fn run_benchmark(
    runs: usize,
    floors: u32,
    shops_per_floor: u32,
    penalty: f64,
    seed: u64,
    output: &PathBuf,
) {
    let mut bench = Benchmark::new(BenchmarkConfig {
        runs,
        num_floors: floors,
        shops_per_floor,
        floor_penalty: penalty,
        base_seed: seed,
    });
    bench.run();

    println!("Benchmark started at {}", bench.started_at);
    println!();
    println!(
        "{:<25} {:>6} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "Algorithm", "Runs", "Avg", "Std", "Best", "Worst", "Impr%"
    );
    for stat in bench.compute_statistics() {
        println!(
            "{:<25} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2}",
            stat.algorithm,
            stat.runs,
            stat.avg_cost,
            stat.std_cost,
            stat.best_cost,
            stat.worst_cost,
            stat.avg_improvement_pct,
        );
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Error creating output directory: {}", e);
        process::exit(1);
    }
    let results_path = output.join("results.csv");
    let stats_path = output.join("statistics.csv");
    if let Err(e) = bench.export_to_csv(&results_path) {
        eprintln!("Error exporting results: {}", e);
        process::exit(1);
    }
    if let Err(e) = bench.export_statistics_csv(&stats_path) {
        eprintln!("Error exporting statistics: {}", e);
        process::exit(1);
    }
    println!();
    println!("Results written to {} and {}", results_path.display(), stats_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_end_prefers_last_shop() {
        assert_eq!(default_end(15, 0), 14);
        assert_eq!(default_end(15, 7), 14);
    }

    #[test]
    fn test_default_end_avoids_start_collision() {
        // Start is the last shop: fall back to the first
        assert_eq!(default_end(15, 14), 0);
        // Degenerate single-shop mall: both defaults are shop 0
        assert_eq!(default_end(1, 0), 0);
    }
}
