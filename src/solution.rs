//! Solution report for a finished annealing run.
//!
//! A [`Solution`] is a plain serialisable snapshot of the best tour together
//! with the data needed to reproduce and compare the run.

use crate::error::Result;
use crate::heuristics::annealing::{AnnealingOutcome, AnnealingSchedule};
use crate::tour::Tour;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Best tour of a run, in reporting form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// City names in visiting order
    pub tour: Vec<String>,
    /// Coordinates in visiting order
    pub coordinates: Vec<(f64, f64)>,
    /// Length of the closed loop
    pub cost: f64,
    /// Length of the starting loop
    pub initial_cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Schedule used for the run
    pub schedule: AnnealingSchedule,
    /// Seed of the random source, if any
    pub seed: Option<u64>,
}

impl Solution {
    pub fn from_tour(tour: &Tour, algorithm: &str) -> Self {
        Solution {
            tour: tour.names().into_iter().map(str::to_string).collect(),
            coordinates: tour.coordinates(),
            cost: tour.cost(),
            initial_cost: tour.cost(),
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: 0,
            schedule: AnnealingSchedule::default(),
            seed: None,
        }
    }

    pub fn from_outcome(
        outcome: &AnnealingOutcome,
        schedule: AnnealingSchedule,
        seed: Option<u64>,
        algorithm: &str,
    ) -> Self {
        let mut solution = Self::from_tour(&outcome.best, algorithm);
        solution.initial_cost = outcome.stats.initial_cost;
        solution.computation_time = outcome.stats.elapsed_secs;
        solution.iterations = outcome.stats.iterations;
        solution.schedule = schedule;
        solution.seed = seed;
        solution
    }

    /// Reduction in loop length relative to the starting tour
    pub fn improvement(&self) -> f64 {
        self.initial_cost - self.cost
    }

    /// Write the solution as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Initial cost: {:.2}", self.initial_cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::annealing::SimulatedAnnealing;
    use crate::random::RngSource;
    use crate::tour::City;

    fn triangle() -> Tour {
        Tour::new(vec![
            City::new("a", 0.0, 0.0),
            City::new("b", 3.0, 0.0),
            City::new("c", 3.0, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_tour() {
        let sol = Solution::from_tour(&triangle(), "test");
        assert_eq!(sol.tour, vec!["a", "b", "c"]);
        assert!((sol.cost - 12.0).abs() < 1e-12);
        assert_eq!(sol.improvement(), 0.0);
    }

    #[test]
    fn test_from_outcome_and_json() {
        let sa = SimulatedAnnealing::new();
        let outcome = sa.run(triangle(), &mut RngSource::seeded(1)).unwrap();
        let sol = Solution::from_outcome(&outcome, sa.schedule, Some(1), sa.name());

        assert_eq!(sol.iterations, 2062);
        assert_eq!(sol.seed, Some(1));
        assert!(sol.improvement() >= 0.0);

        let json = serde_json::to_string(&sol).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tour, sol.tour);
        assert!(sol.to_string().contains("SimulatedAnnealing"));
    }
}
