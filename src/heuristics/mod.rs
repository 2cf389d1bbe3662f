//! Tour optimization heuristics.
//!
//! Two phases: greedy construction (nearest neighbor) and local-search
//! refinement (2-opt over an open path with fixed endpoints).

pub mod construction;
pub mod local_search;

pub use construction::{ConstructionHeuristic, NearestNeighbor};
pub use local_search::{LocalSearch, TwoOpt};
