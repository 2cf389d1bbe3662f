//! Tour planning: validation and the construct-then-refine pipeline.
//!
//! `plan_tour` is the library entry point: it validates the request, builds
//! an initial tour with nearest-neighbor construction from the start shop,
//! forces the designated end shop into the final slot, and refines the
//! interior with 2-opt while both endpoints stay fixed.

use crate::heuristics::{ConstructionHeuristic, LocalSearch, NearestNeighbor, TwoOpt};
use crate::mall::Mall;
use crate::tour::Tour;

/// Input validation failures, checked once before any computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// The mall has no shops
    EmptyMall,
    /// Start index is not a valid shop index
    StartOutOfRange { start: usize, len: usize },
    /// End index is not a valid shop index
    EndOutOfRange { end: usize, len: usize },
    /// Start and end must differ when there is more than one shop
    StartEqualsEnd { index: usize },
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            PlanError::EmptyMall => write!(f, "mall has no shops"),
            PlanError::StartOutOfRange { start, len } => {
                write!(f, "start index {} out of range (mall has {} shops)", start, len)
            }
            PlanError::EndOutOfRange { end, len } => {
                write!(f, "end index {} out of range (mall has {} shops)", end, len)
            }
            PlanError::StartEqualsEnd { index } => {
                write!(f, "start and end are both shop {} but the mall has more than one shop", index)
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Plan a walking tour visiting every shop, from `start` to `end`.
///
/// Returns the refined tour; its `cost` field holds the total walking cost
/// including floor penalties. The order is a permutation of all shop
/// indices with `order[0] == start` and `order[N-1] == end`.
pub fn plan_tour(mall: &Mall, start: usize, end: usize) -> Result<Tour, PlanError> {
    validate(mall, start, end)?;

    if mall.len() == 1 {
        return Ok(Tour::from_order(mall, vec![0], "trivial"));
    }

    let mut tour = NearestNeighbor::new().construct(mall, start);
    log::info!("construction: cost {:.2}", tour.cost);

    // Unconstrained nearest-neighbor rarely finishes on the requested end
    // shop; swap it into the last slot and let refinement repair the rest.
    pin_end(mall, &mut tour, end);

    TwoOpt::new().improve(mall, &mut tour);
    log::info!("refinement: cost {:.2} after {:?} passes", tour.cost, tour.passes);

    tour.algorithm = "NearestNeighbor+2-Opt".to_string();
    Ok(tour)
}

fn validate(mall: &Mall, start: usize, end: usize) -> Result<(), PlanError> {
    let len = mall.len();
    if len == 0 {
        return Err(PlanError::EmptyMall);
    }
    if start >= len {
        return Err(PlanError::StartOutOfRange { start, len });
    }
    if end >= len {
        return Err(PlanError::EndOutOfRange { end, len });
    }
    if start == end && len > 1 {
        return Err(PlanError::StartEqualsEnd { index: start });
    }
    Ok(())
}

/// Swap the designated end shop into the last tour slot.
fn pin_end(mall: &Mall, tour: &mut Tour, end: usize) {
    let last = tour.order.len() - 1;
    // end is guaranteed present: the tour is a permutation
    let pos = tour.position(end).unwrap();
    if pos != last {
        tour.order.swap(pos, last);
        tour.validate(mall);
    }
}
