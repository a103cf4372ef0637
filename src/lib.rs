//! TSP Annealing Solver Library
//!
//! Searches for a short closed tour through a fixed set of cities with
//! single-chain simulated annealing over adjacent-swap neighborhoods.
//!
//! # Features
//!
//! - Immutable [`Tour`] values with cached length and adjacent-swap successors
//! - Geometric cooling schedule with Metropolis acceptance
//! - Injected, seedable random sources for reproducible runs
//! - JSON instance loading, JSON solution reports and SVG rendering
//!
//! # Example
//!
//! ```no_run
//! use tsp_annealing::instance::TspInstance;
//! use tsp_annealing::heuristics::annealing::SimulatedAnnealing;
//! use tsp_annealing::random::RngSource;
//!
//! let instance = TspInstance::from_file("capitals.json").unwrap();
//! let initial = instance.initial_tour().unwrap();
//!
//! let sa = SimulatedAnnealing::new();
//! let best = sa.optimize(initial, &mut RngSource::seeded(42)).unwrap();
//!
//! println!("Tour length: {:.2}", best.cost());
//! ```

pub mod error;
pub mod tour;
pub mod random;
pub mod heuristics;
pub mod instance;
pub mod solution;
pub mod visualization;

pub use error::{Result, SolverError};
pub use instance::TspInstance;
pub use solution::Solution;
pub use tour::{City, Tour};
