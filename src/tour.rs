//! Tour representation and move mechanics.
//!
//! A tour is an open walking path: a permutation of shop indices visited
//! from the first element to the last, with no return edge. The refinement
//! phase mutates the order in place through 2-opt segment reversals.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::mall::Mall;

/// A walking tour through all shops of a mall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// Visiting order as shop indices; an open path, not a cycle
    pub order: Vec<usize>,
    /// Total walking cost over consecutive pairs
    pub cost: f64,
    /// Algorithm that produced this tour
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of refinement passes (if applicable)
    pub passes: Option<usize>,
}

impl Tour {
    /// Create a tour from a visiting order, computing its cost.
    pub fn from_order(mall: &Mall, order: Vec<usize>, algorithm: &str) -> Self {
        let cost = Self::cost_of(mall, &order);
        Tour {
            order,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            passes: None,
        }
    }

    /// Total walking cost of an order: sum of edge costs over consecutive
    /// pairs. No closing edge back to the start.
    pub fn cost_of(mall: &Mall, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|pair| mall.cost(pair[0], pair[1]))
            .sum()
    }

    /// Recompute and store the cost from the current order.
    pub fn validate(&mut self, mall: &Mall) {
        self.cost = Self::cost_of(mall, &self.order);
    }

    /// Check the permutation invariant: every shop index appears exactly once.
    pub fn is_complete(&self, mall: &Mall) -> bool {
        if self.order.len() != mall.len() {
            return false;
        }
        let unique: HashSet<usize> = self.order.iter().cloned().collect();
        unique.len() == mall.len() && self.order.iter().all(|&i| i < mall.len())
    }

    /// Position of a shop index within the tour.
    pub fn position(&self, shop: usize) -> Option<usize> {
        self.order.iter().position(|&s| s == shop)
    }

    /// Cost delta of reversing `order[i+1..=j]`.
    ///
    /// Only the two boundary edges change; interior edge costs are symmetric
    /// under reversal, so the delta is exact from four lookups. Requires
    /// `i + 1 < j` and `j + 1 < order.len()` so both endpoints of the path
    /// stay in place.
    pub fn two_opt_delta(&self, mall: &Mall, i: usize, j: usize) -> f64 {
        let t = &self.order;
        let removed = mall.cost(t[i], t[i + 1]) + mall.cost(t[j], t[j + 1]);
        let added = mall.cost(t[i], t[j]) + mall.cost(t[i + 1], t[j + 1]);
        added - removed
    }

    /// Apply a 2-opt move: reverse the segment between i+1 and j inclusive.
    pub fn apply_two_opt(&mut self, i: usize, j: usize) {
        self.order[i + 1..=j].reverse();
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(p) = self.passes {
            writeln!(f, "  Passes: {}", p)?;
        }
        writeln!(f, "  Order: {:?}", self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mall::Shop;

    fn line_mall() -> Mall {
        let shops = vec![
            Shop::new("a", 1, 0.0, 0.0),
            Shop::new("b", 1, 1.0, 0.0),
            Shop::new("c", 1, 2.0, 0.0),
            Shop::new("d", 1, 3.0, 0.0),
        ];
        Mall::new("line", shops, 50.0)
    }

    #[test]
    fn test_open_path_cost() {
        let mall = line_mall();
        let tour = Tour::from_order(&mall, vec![0, 1, 2, 3], "test");
        // Three edges of length 1, no closing edge
        assert!((tour.cost - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_two_opt_delta_matches_recost() {
        let mall = line_mall();
        let mut tour = Tour::from_order(&mall, vec![0, 2, 1, 3], "test");
        let delta = tour.two_opt_delta(&mall, 0, 2);
        let before = tour.cost;
        tour.apply_two_opt(0, 2);
        tour.validate(&mall);
        assert!((tour.cost - (before + delta)).abs() < 1e-10);
        assert_eq!(tour.order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_is_complete() {
        let mall = line_mall();
        let good = Tour::from_order(&mall, vec![3, 1, 0, 2], "test");
        assert!(good.is_complete(&mall));

        let duplicated = Tour::from_order(&mall, vec![0, 1, 1, 3], "test");
        assert!(!duplicated.is_complete(&mall));

        let short = Tour::from_order(&mall, vec![0, 1, 2], "test");
        assert!(!short.is_complete(&mall));
    }

    #[test]
    fn test_single_shop_tour_costs_zero() {
        let mall = Mall::new("one", vec![Shop::new("a", 1, 5.0, 5.0)], 50.0);
        let tour = Tour::from_order(&mall, vec![0], "test");
        assert_eq!(tour.cost, 0.0);
    }
}
