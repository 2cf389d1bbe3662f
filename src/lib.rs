//! Mall Walking-Tour Solver Library
//!
//! Plans a short walking tour visiting every shop in a multi-floor mall,
//! from a designated start shop to a designated end shop. The walking cost
//! between two shops is their planar Euclidean distance plus a flat penalty
//! whenever they sit on different floors.
//!
//! # Features
//!
//! - Nearest-Neighbor tour construction with deterministic tie-breaking
//! - 2-opt local search over an open path with fixed endpoints
//! - Seeded random mall generation and JSON layout persistence
//! - Benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use mall_tour_solver::mall::Mall;
//! use mall_tour_solver::planner::plan_tour;
//!
//! // Generate a 3-floor mall with 5 shops per floor
//! let mall = Mall::generate(3, 5, 50.0, 42);
//!
//! // Walk from the first shop to the last
//! let tour = plan_tour(&mall, 0, mall.len() - 1).unwrap();
//!
//! println!("Total walking cost: {:.2}", tour.cost);
//! for &i in &tour.order {
//!     println!("  {}", mall.shops[i].name);
//! }
//! ```

pub mod benchmark;
pub mod cost;
pub mod heuristics;
pub mod mall;
pub mod planner;
pub mod tour;
pub mod visualization;

pub use cost::CostModel;
pub use mall::{Mall, Shop};
pub use planner::{plan_tour, PlanError};
pub use tour::Tour;
