//! Construction heuristics: build an initial tour from scratch.

use std::collections::HashSet;

use ordered_float::OrderedFloat;

use crate::mall::Mall;
use crate::tour::Tour;

/// Trait for heuristics that build a complete tour from a start shop.
pub trait ConstructionHeuristic {
    fn construct(&self, mall: &Mall, start: usize) -> Tour;
    fn name(&self) -> &str;
}

/// Nearest-Neighbor construction.
///
/// Repeatedly extends the path to the cheapest unvisited shop under the
/// mall's cost model. Ties are broken toward the lowest shop index, so the
/// result is deterministic for a given layout.
pub struct NearestNeighbor;

impl NearestNeighbor {
    pub fn new() -> Self {
        NearestNeighbor
    }

    /// Cheapest unvisited shop from `current`. Iteration runs in index
    /// order and `min_by_key` keeps the first minimum, which is the
    /// lowest-index tie-break.
    fn find_nearest(&self, mall: &Mall, current: usize, visited: &HashSet<usize>) -> Option<usize> {
        (0..mall.len())
            .filter(|n| !visited.contains(n))
            .min_by_key(|&n| OrderedFloat(mall.cost(current, n)))
    }
}

impl Default for NearestNeighbor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighbor {
    fn construct(&self, mall: &Mall, start: usize) -> Tour {
        let begin = std::time::Instant::now();

        let mut order = vec![start];
        let mut visited = HashSet::new();
        visited.insert(start);

        let mut current = start;
        while visited.len() < mall.len() {
            // find_nearest only returns None once every shop is visited
            if let Some(next) = self.find_nearest(mall, current, &visited) {
                order.push(next);
                visited.insert(next);
                current = next;
            } else {
                break;
            }
        }

        let mut tour = Tour::from_order(mall, order, self.name());
        tour.computation_time = begin.elapsed().as_secs_f64();
        log::debug!("{}: constructed tour of cost {:.2}", self.name(), tour.cost);
        tour
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}
