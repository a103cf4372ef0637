//! Heuristics module for the TSP.
//!
//! This module exports the simulated annealing optimizer.

pub mod annealing;

pub use annealing::*;
