//! Benchmarking over generated mall layouts.
//!
//! Runs construction-only and construction+refinement on a series of
//! seeded random malls, collects per-run records, aggregates per-phase
//! statistics, and exports both to CSV.

use std::fs::File;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::heuristics::{ConstructionHeuristic, LocalSearch, NearestNeighbor, TwoOpt};
use crate::mall::Mall;
use crate::planner;

/// Benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of random malls to solve
    pub runs: usize,
    pub num_floors: u32,
    pub shops_per_floor: u32,
    pub floor_penalty: f64,
    /// Seed of the first mall; run k uses base_seed + k
    pub base_seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            runs: 20,
            num_floors: 3,
            shops_per_floor: 10,
            floor_penalty: crate::mall::DEFAULT_FLOOR_PENALTY,
            base_seed: 42,
        }
    }
}

/// Result of one phase on one generated mall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub instance: String,
    pub num_shops: usize,
    pub algorithm: String,
    pub cost: f64,
    /// Cost reduction relative to the construction phase, in percent
    pub improvement_pct: f64,
    /// Total wall time to produce this tour, including earlier phases
    pub time: f64,
    /// Wall time of the refinement phase alone; empty for construction rows
    pub refine_time: Option<f64>,
    pub passes: Option<usize>,
}

/// Aggregated statistics for one phase across all runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStatistics {
    pub algorithm: String,
    pub runs: usize,
    pub avg_cost: f64,
    pub std_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub avg_improvement_pct: f64,
    pub avg_time: f64,
}

/// Benchmark harness.
pub struct Benchmark {
    pub config: BenchmarkConfig,
    pub results: Vec<BenchmarkRecord>,
    /// RFC 3339 timestamp of when the run started
    pub started_at: String,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            started_at: chrono::Local::now().to_rfc3339(),
        }
    }

    /// Solve one generated mall, producing a construction record and a
    /// refined record.
    fn run_one(&self, seed: u64) -> Vec<BenchmarkRecord> {
        let mall = Mall::generate(
            self.config.num_floors,
            self.config.shops_per_floor,
            self.config.floor_penalty,
            seed,
        );
        let n = mall.len();

        let constructed = NearestNeighbor::new().construct(&mall, 0);
        let base_cost = constructed.cost;

        let mut refined = constructed.clone();
        let refine_begin = std::time::Instant::now();
        TwoOpt::new().improve(&mall, &mut refined);
        let refine_time = refine_begin.elapsed().as_secs_f64();

        let improvement = if base_cost > 0.0 {
            (base_cost - refined.cost) / base_cost * 100.0
        } else {
            0.0
        };

        vec![
            BenchmarkRecord {
                instance: mall.name.clone(),
                num_shops: n,
                algorithm: constructed.algorithm.clone(),
                cost: base_cost,
                improvement_pct: 0.0,
                time: constructed.computation_time,
                refine_time: None,
                passes: None,
            },
            BenchmarkRecord {
                instance: mall.name,
                num_shops: n,
                algorithm: "NearestNeighbor+2-Opt".to_string(),
                cost: refined.cost,
                improvement_pct: improvement,
                time: constructed.computation_time + refine_time,
                refine_time: Some(refine_time),
                passes: refined.passes,
            },
        ]
    }

    /// Run the configured number of instances in parallel.
    pub fn run(&mut self) {
        log::info!(
            "benchmark: {} runs of {}x{} shops, penalty {:.1}",
            self.config.runs,
            self.config.num_floors,
            self.config.shops_per_floor,
            self.config.floor_penalty
        );

        let bar = ProgressBar::new(self.config.runs as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} malls")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let seeds: Vec<u64> = (0..self.config.runs as u64)
            .map(|k| self.config.base_seed + k)
            .collect();

        let mut results: Vec<BenchmarkRecord> = seeds
            .par_iter()
            .flat_map(|&seed| {
                let records = self.run_one(seed);
                bar.inc(1);
                records
            })
            .collect();
        bar.finish_and_clear();

        results.sort_by(|a, b| a.instance.cmp(&b.instance));
        self.results = results;
    }

    /// Aggregate per-phase statistics over all recorded runs.
    pub fn compute_statistics(&self) -> Vec<PhaseStatistics> {
        let mut algorithms: Vec<String> = self.results.iter().map(|r| r.algorithm.clone()).collect();
        algorithms.sort();
        algorithms.dedup();

        let mut stats: Vec<PhaseStatistics> = algorithms
            .into_iter()
            .map(|algo| {
                let records: Vec<&BenchmarkRecord> =
                    self.results.iter().filter(|r| r.algorithm == algo).collect();
                let costs: Vec<f64> = records.iter().map(|r| r.cost).collect();
                let times: Vec<f64> = records.iter().map(|r| r.time).collect();
                let improvements: Vec<f64> =
                    records.iter().map(|r| r.improvement_pct).collect();

                PhaseStatistics {
                    algorithm: algo,
                    runs: records.len(),
                    avg_cost: (&costs).mean(),
                    std_cost: (&costs).std_dev(),
                    best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_cost: costs.iter().cloned().fold(0.0, f64::max),
                    avg_improvement_pct: (&improvements).mean(),
                    avg_time: (&times).mean(),
                }
            })
            .collect();

        stats.sort_by(|a, b| a.avg_cost.partial_cmp(&b.avg_cost).unwrap());
        stats
    }

    /// Export per-run records to CSV.
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        for record in &self.results {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export aggregated statistics to CSV.
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Quick single-mall comparison used by the CLI `solve --verbose` path:
/// returns (construction cost, refined cost).
pub fn compare_phases(mall: &Mall, start: usize, end: usize) -> Result<(f64, f64), crate::planner::PlanError> {
    let constructed = NearestNeighbor::new().construct(mall, start);
    let refined = planner::plan_tour(mall, start, end)?;
    Ok((constructed.cost, refined.cost))
}
