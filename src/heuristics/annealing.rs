//! Simulated annealing over adjacent-swap neighborhoods.
//!
//! Each iteration draws one successor of the current tour uniformly at random.
//! Strictly shorter tours are always accepted; other tours are accepted with
//! probability `exp(delta / T)` where `delta = fitness(candidate) - fitness(current)`.
//! The temperature is multiplied by the cooling rate after every iteration and
//! the run ends once it drops to the final temperature, so the number of
//! iterations depends only on the schedule.

use crate::error::{Result, SolverError};
use crate::random::RandomSource;
use crate::tour::Tour;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Smallest tour the optimizer accepts as a meaningful closed loop
pub const MIN_CITIES: usize = 3;

/// Geometric cooling schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealingSchedule {
    /// Initial temperature
    pub initial_temp: f64,
    /// Final temperature; the loop runs while the temperature is above it
    pub final_temp: f64,
    /// Cooling rate applied after each iteration
    pub cooling_rate: f64,
}

impl AnnealingSchedule {
    pub fn new() -> Self {
        AnnealingSchedule {
            initial_temp: 1e4,
            final_temp: 1e-5,
            cooling_rate: 0.99,
        }
    }

    pub fn with_params(initial_temp: f64, final_temp: f64, cooling_rate: f64) -> Self {
        AnnealingSchedule {
            initial_temp,
            final_temp,
            cooling_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temp.is_finite() && self.initial_temp > 0.0) {
            return Err(SolverError::InvalidSchedule(format!(
                "initial temperature must be positive, got {}",
                self.initial_temp
            )));
        }
        if !(self.final_temp.is_finite() && self.final_temp > 0.0) {
            return Err(SolverError::InvalidSchedule(format!(
                "final temperature must be positive, got {}",
                self.final_temp
            )));
        }
        if self.final_temp >= self.initial_temp {
            return Err(SolverError::InvalidSchedule(format!(
                "final temperature {} must be below initial temperature {}",
                self.final_temp, self.initial_temp
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(SolverError::InvalidSchedule(format!(
                "cooling rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }

    /// Number of iterations the annealing loop executes, replaying the cooling sequence
    pub fn iteration_count(&self) -> Result<usize> {
        self.validate()?;
        let mut temp = self.initial_temp;
        let mut count = 0;
        while temp > self.final_temp {
            temp *= self.cooling_rate;
            count += 1;
        }
        Ok(count)
    }

    /// `ceil(ln(final / initial) / ln(cooling_rate))`
    pub fn closed_form_iterations(&self) -> Result<usize> {
        self.validate()?;
        Ok(((self.final_temp / self.initial_temp).ln() / self.cooling_rate.ln()).ceil() as usize)
    }
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Metropolis acceptance probability for a non-improving move.
///
/// Underflows to `0.0` for very negative `delta` at low temperature.
#[inline]
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    (delta / temperature).exp()
}

/// Outcome of a single annealing iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Candidate strictly shorter than the current tour
    Improved,
    /// Candidate not shorter, accepted by the Metropolis test
    Accepted,
    /// Candidate discarded
    Rejected,
}

/// One row of the per-iteration trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub iteration: usize,
    pub temperature: f64,
    pub decision: Decision,
    pub current_cost: f64,
    pub best_cost: f64,
}

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnealingStats {
    /// Iterations executed
    pub iterations: usize,
    /// Strictly improving moves
    pub improving_moves: usize,
    /// Non-improving moves accepted by the Metropolis test
    pub accepted_moves: usize,
    /// Rejected candidates
    pub rejected_moves: usize,
    /// Times the best tour was replaced
    pub best_updates: usize,
    pub initial_cost: f64,
    pub best_cost: f64,
    /// Temperature when the loop stopped
    pub final_temperature: f64,
    /// Wall-clock time in seconds
    pub elapsed_secs: f64,
    /// Whether the wall-clock budget ended the run
    pub stopped_by_time_limit: bool,
}

impl AnnealingStats {
    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Improved => self.improving_moves += 1,
            Decision::Accepted => self.accepted_moves += 1,
            Decision::Rejected => self.rejected_moves += 1,
        }
    }

    /// Fraction of candidates that replaced the current tour
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        (self.improving_moves + self.accepted_moves) as f64 / self.iterations as f64
    }
}

/// Result of [`SimulatedAnnealing::run`]
#[derive(Debug, Clone)]
pub struct AnnealingOutcome {
    /// Best tour seen during the run
    pub best: Tour,
    pub stats: AnnealingStats,
    /// Per-iteration trace, empty unless step recording is enabled
    pub steps: Vec<StepRecord>,
}

impl AnnealingOutcome {
    /// Write the per-iteration trace as CSV
    pub fn export_steps_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for step in &self.steps {
            writer.serialize(step)?;
        }
        writer.flush()?;
        Ok(())
    }
}

struct SearchState {
    current: Tour,
    best: Tour,
    temperature: f64,
}

impl SearchState {
    fn new(problem: Tour, temperature: f64) -> Self {
        SearchState {
            best: problem.clone(),
            current: problem,
            temperature,
        }
    }

    fn step<R: RandomSource>(&mut self, rng: &mut R) -> Result<Decision> {
        let successors = self.current.successors();
        let candidate = rng.choose_one(&successors)?;

        let decision = if candidate.fitness() > self.current.fitness() {
            Decision::Improved
        } else {
            let delta = candidate.fitness() - self.current.fitness();
            let probability = acceptance_probability(delta, self.temperature);
            if probability > rng.uniform()? {
                Decision::Accepted
            } else {
                Decision::Rejected
            }
        };

        if decision != Decision::Rejected {
            self.current = candidate.clone();
        }
        Ok(decision)
    }

    fn update_best(&mut self) -> bool {
        if self.current.fitness() > self.best.fitness() {
            self.best = self.current.clone();
            true
        } else {
            false
        }
    }
}

/// Single-chain simulated annealing optimizer
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    pub schedule: AnnealingSchedule,
    /// Optional wall-clock budget, checked before each iteration
    pub time_limit: Option<Duration>,
    /// Keep a [`StepRecord`] for every iteration
    pub record_steps: bool,
}

impl SimulatedAnnealing {
    pub fn new() -> Self {
        Self::with_schedule(AnnealingSchedule::default())
    }

    pub fn with_schedule(schedule: AnnealingSchedule) -> Self {
        SimulatedAnnealing {
            schedule,
            time_limit: None,
            record_steps: false,
        }
    }

    pub fn name(&self) -> &str {
        "SimulatedAnnealing"
    }

    /// Anneal from `problem` and return the best tour found
    pub fn optimize<R: RandomSource>(&self, problem: Tour, rng: &mut R) -> Result<Tour> {
        self.run(problem, rng).map(|outcome| outcome.best)
    }

    /// Anneal from `problem`, returning the best tour with run statistics
    pub fn run<R: RandomSource>(&self, problem: Tour, rng: &mut R) -> Result<AnnealingOutcome> {
        self.schedule.validate()?;
        if problem.num_cities() < MIN_CITIES {
            return Err(SolverError::invalid_input(format!(
                "need at least {} cities to anneal a closed loop, got {}",
                MIN_CITIES,
                problem.num_cities()
            )));
        }

        let start = Instant::now();
        let mut stats = AnnealingStats {
            initial_cost: problem.cost(),
            ..Default::default()
        };
        let mut steps = Vec::new();

        log::info!(
            "Annealing {} cities from cost {:.2} (T0={}, alpha={}, Tmin={})",
            problem.num_cities(),
            stats.initial_cost,
            self.schedule.initial_temp,
            self.schedule.cooling_rate,
            self.schedule.final_temp
        );

        let mut state = SearchState::new(problem, self.schedule.initial_temp);

        while state.temperature > self.schedule.final_temp {
            if let Some(limit) = self.time_limit {
                if start.elapsed() >= limit {
                    log::info!("Time limit reached after {} iterations", stats.iterations);
                    stats.stopped_by_time_limit = true;
                    break;
                }
            }

            let decision = state.step(rng)?;
            stats.record(decision);

            if state.update_best() {
                stats.best_updates += 1;
                log::debug!(
                    "Iteration {}: new best {:.2} at T={:.4}",
                    stats.iterations,
                    state.best.cost(),
                    state.temperature
                );
            }

            log::trace!(
                "Iteration {}: {:?}, current {:.2}, T={:.6}",
                stats.iterations,
                decision,
                state.current.cost(),
                state.temperature
            );

            if self.record_steps {
                steps.push(StepRecord {
                    iteration: stats.iterations,
                    temperature: state.temperature,
                    decision,
                    current_cost: state.current.cost(),
                    best_cost: state.best.cost(),
                });
            }

            state.temperature *= self.schedule.cooling_rate;
            stats.iterations += 1;
        }

        stats.best_cost = state.best.cost();
        stats.final_temperature = state.temperature;
        stats.elapsed_secs = start.elapsed().as_secs_f64();

        log::info!(
            "Annealing finished: {} iterations, best cost {:.2} (initial {:.2}), {} best updates",
            stats.iterations,
            stats.best_cost,
            stats.initial_cost,
            stats.best_updates
        );

        Ok(AnnealingOutcome {
            best: state.best,
            stats,
            steps,
        })
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}
