//! VRP (Vehicle Routing Problem) solver seam
//!
//! The sweep talks to an [`Optimizer`]; [`PragmaticOptimizer`] is the
//! production implementation on top of vrp-pragmatic/vrp-core.

mod adapter;
mod config;
mod pragmatic;
mod problem;
mod solution;

pub use config::SolverConfig;
pub use pragmatic::PragmaticOptimizer;
pub use problem::RoutingProblem;
pub use solution::Solution;

use anyhow::Result;

use crate::error::PlanningError;

/// Pickup-and-delivery optimizer with a finite fleet.
///
/// Shipments it cannot serve are reported as unassigned, never as errors.
pub trait Optimizer {
    /// Candidate solutions, in no particular order
    fn solve(&self, problem: &RoutingProblem) -> Result<Vec<Solution>>;

    /// Optimizer name for logging
    fn name(&self) -> &str;
}

/// Lowest-cost solution of the candidates
pub fn best_of(solutions: Vec<Solution>) -> Result<Solution, PlanningError> {
    solutions
        .into_iter()
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
        .ok_or(PlanningError::NoSolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cost(cost: f64) -> Solution {
        Solution { cost, ..Solution::empty() }
    }

    #[test]
    fn best_of_picks_lowest_cost() {
        let best = best_of(vec![with_cost(30.0), with_cost(10.0), with_cost(20.0)]).unwrap();
        assert_eq!(best.cost, 10.0);
    }

    #[test]
    fn best_of_empty_list_is_an_error() {
        assert_eq!(best_of(vec![]), Err(PlanningError::NoSolution));
    }
}
