//! Walking-cost model.
//!
//! The cost of moving between two shops is the planar Euclidean distance
//! plus a flat penalty whenever the shops are on different floors. The
//! penalty is binary: a two-floor jump costs the same as a one-floor jump.

use crate::mall::Shop;

/// Pairwise walking-cost function over shops.
///
/// Pure and symmetric: `cost(a, b) == cost(b, a)`, always non-negative,
/// zero only for coincident shops on the same floor.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    floor_penalty: f64,
}

impl CostModel {
    pub fn new(floor_penalty: f64) -> Self {
        debug_assert!(floor_penalty >= 0.0);
        CostModel { floor_penalty }
    }

    #[inline]
    pub fn floor_penalty(&self) -> f64 {
        self.floor_penalty
    }

    /// Walking cost between two shops.
    #[inline]
    pub fn cost(&self, a: &Shop, b: &Shop) -> f64 {
        let horizontal = (a.x - b.x).hypot(a.y - b.y);
        if a.floor != b.floor {
            horizontal + self.floor_penalty
        } else {
            horizontal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_floor_distance() {
        let model = CostModel::new(50.0);
        let a = Shop::new("a", 1, 0.0, 0.0);
        let b = Shop::new("b", 1, 6.0, 8.0);
        assert!((model.cost(&a, &b) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_floor_change_adds_penalty() {
        let model = CostModel::new(50.0);
        let a = Shop::new("a", 1, 0.0, 0.0);
        let b = Shop::new("b", 2, 6.0, 8.0);
        assert!((model.cost(&a, &b) - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_penalty_is_binary_not_per_floor() {
        let model = CostModel::new(50.0);
        let a = Shop::new("a", 1, 0.0, 0.0);
        let b = Shop::new("b", 4, 0.0, 0.0);
        // Three floors crossed, penalty applied once
        assert!((model.cost(&a, &b) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetry() {
        let model = CostModel::new(30.0);
        let a = Shop::new("a", 1, 12.5, -3.0);
        let b = Shop::new("b", 3, -7.0, 44.0);
        assert_eq!(model.cost(&a, &b), model.cost(&b, &a));
    }

    #[test]
    fn test_coincident_shops() {
        let model = CostModel::new(50.0);
        let a = Shop::new("a", 1, 5.0, 5.0);
        let b = Shop::new("b", 1, 5.0, 5.0);
        assert_eq!(model.cost(&a, &b), 0.0);

        // Coincident but on different floors: penalty only
        let c = Shop::new("c", 2, 5.0, 5.0);
        assert!((model.cost(&a, &c) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_non_negative() {
        let model = CostModel::new(0.0);
        let a = Shop::new("a", 1, -10.0, -10.0);
        let b = Shop::new("b", 2, -10.0, -10.0);
        assert!(model.cost(&a, &b) >= 0.0);
    }
}
