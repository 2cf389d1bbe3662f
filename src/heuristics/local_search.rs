//! Local search refinement for walking tours.
//!
//! Implements 2-opt over an open path: the first and last shops of the
//! tour are fixed endpoints and are never relocated by a move.

use crate::mall::Mall;
use crate::tour::Tour;

/// Deltas closer to zero than this are treated as non-improving, so
/// floating-point ties cannot keep the scan alive forever.
const EPSILON: f64 = 1e-9;

/// Trait for local search improvement methods.
pub trait LocalSearch {
    /// Improve `tour` in place. Returns true if any improving move was made.
    fn improve(&self, mall: &Mall, tour: &mut Tour) -> bool;
    fn name(&self) -> &str;
}

/// 2-opt local search with first-improvement acceptance.
///
/// Each pass scans all eligible edge pairs in order; an improving move is
/// applied immediately and the scan continues. The search terminates when
/// a full pass finds no improving move, or when the optional pass cap is
/// reached (the tour found so far is kept).
pub struct TwoOpt {
    /// Upper bound on full passes; None runs to the local optimum
    pub max_passes: Option<usize>,
}

impl TwoOpt {
    pub fn new() -> Self {
        TwoOpt { max_passes: None }
    }

    pub fn with_max_passes(max_passes: usize) -> Self {
        TwoOpt { max_passes: Some(max_passes) }
    }
}

impl Default for TwoOpt {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TwoOpt {
    fn improve(&self, mall: &Mall, tour: &mut Tour) -> bool {
        let n = tour.order.len();
        if n < 4 {
            return false;
        }

        let begin = std::time::Instant::now();
        let mut total_improved = false;
        let mut improved = true;
        let mut passes = 0;

        while improved {
            if let Some(cap) = self.max_passes {
                if passes >= cap {
                    log::debug!("{}: pass cap {} reached", self.name(), cap);
                    break;
                }
            }
            improved = false;
            passes += 1;

            // Reversing order[i+1..=j] moves positions i+1 and j, so
            // position 0 stays put for any i >= 0 and position n-1 stays
            // put for any j <= n-2. Both path endpoints remain fixed.
            for i in 0..n - 3 {
                for j in i + 2..n - 1 {
                    let delta = tour.two_opt_delta(mall, i, j);
                    if delta < -EPSILON {
                        tour.apply_two_opt(i, j);
                        tour.cost += delta;
                        improved = true;
                        total_improved = true;
                    }
                }
            }
        }

        // Accumulated deltas drift; settle on the exact sum
        tour.validate(mall);
        tour.computation_time += begin.elapsed().as_secs_f64();
        tour.passes = Some(passes);
        log::debug!(
            "{}: {} passes, final cost {:.2}",
            self.name(), passes, tour.cost
        );
        total_improved
    }

    fn name(&self) -> &str {
        "2-Opt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::construction::{ConstructionHeuristic, NearestNeighbor};
    use crate::mall::Shop;

    fn mall_from(shops: Vec<Shop>) -> Mall {
        Mall::new("test", shops, 50.0)
    }

    #[test]
    fn test_never_increases_cost() {
        let mall = Mall::generate(3, 8, 50.0, 21);
        let mut tour = NearestNeighbor::new().construct(&mall, 0);
        let before = tour.cost;
        TwoOpt::new().improve(&mall, &mut tour);
        assert!(tour.cost <= before + 1e-9);
        assert!(tour.is_complete(&mall));
    }

    #[test]
    fn test_endpoints_stay_fixed() {
        let mall = Mall::generate(2, 10, 50.0, 9);
        let mut tour = NearestNeighbor::new().construct(&mall, 3);
        let last = *tour.order.last().unwrap();
        TwoOpt::new().improve(&mall, &mut tour);
        assert_eq!(tour.order[0], 3);
        assert_eq!(*tour.order.last().unwrap(), last);
    }

    #[test]
    fn test_uncrosses_square_path() {
        // Unit square; a diagonal-first order crosses itself with cost
        // 1 + 2*sqrt(2) and 2-opt must straighten it to the perimeter
        let mall = mall_from(vec![
            Shop::new("a", 1, 0.0, 0.0),
            Shop::new("b", 1, 0.0, 1.0),
            Shop::new("c", 1, 1.0, 1.0),
            Shop::new("d", 1, 1.0, 0.0),
        ]);
        let mut tour = Tour::from_order(&mall, vec![0, 2, 1, 3], "test");
        TwoOpt::new().improve(&mall, &mut tour);
        assert_eq!(tour.order, vec![0, 1, 2, 3]);
        assert!((tour.cost - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent_at_local_optimum() {
        let mall = Mall::generate(3, 6, 50.0, 33);
        let mut tour = NearestNeighbor::new().construct(&mall, 0);
        TwoOpt::new().improve(&mall, &mut tour);
        let settled = tour.order.clone();
        let cost = tour.cost;

        let changed = TwoOpt::new().improve(&mall, &mut tour);
        assert!(!changed);
        assert_eq!(tour.order, settled);
        assert!((tour.cost - cost).abs() < 1e-9);
    }

    #[test]
    fn test_groups_same_floor_shops() {
        // One shop upstairs between two downstairs shops; with a dominant
        // penalty the refined tour must visit both floor-1 shops before
        // crossing, even though that is geometrically longer
        let mall = Mall::new(
            "floors",
            vec![
                Shop::new("a", 1, 0.0, 0.0),
                Shop::new("b", 2, 1.0, 0.0),
                Shop::new("c", 1, 2.0, 0.0),
            ],
            1000.0,
        );
        let mut tour = Tour::from_order(&mall, vec![0, 1, 2], "test");
        // Too short for 2-opt moves between interior edges; the planner
        // relies on construction for N < 4. Verify improve is a no-op.
        assert!(!TwoOpt::new().improve(&mall, &mut tour));

        // With a fourth shop the crossing order gets repaired
        let mall = Mall::new(
            "floors",
            vec![
                Shop::new("a", 1, 0.0, 0.0),
                Shop::new("b", 2, 1.0, 0.0),
                Shop::new("c", 1, 2.0, 0.0),
                Shop::new("d", 2, 3.0, 0.0),
            ],
            1000.0,
        );
        let mut tour = Tour::from_order(&mall, vec![0, 1, 2, 3], "test");
        TwoOpt::new().improve(&mall, &mut tour);
        // One floor change instead of three
        assert_eq!(tour.order, vec![0, 2, 1, 3]);
        assert!((tour.cost - (2.0 + 1.0 + 1000.0 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pass_cap_short_circuits() {
        let mall = Mall::generate(3, 10, 50.0, 77);
        let mut capped = NearestNeighbor::new().construct(&mall, 0);
        let before = capped.cost;
        TwoOpt::with_max_passes(1).improve(&mall, &mut capped);
        assert!(capped.passes.unwrap() <= 1);
        assert!(capped.cost <= before + 1e-9);
        assert!(capped.is_complete(&mall));
    }
}
