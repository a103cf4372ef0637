//! Tour representation for the TSP.
//!
//! A [`Tour`] is an immutable closed loop over a fixed set of [`City`] values.
//! The city set is shared between a tour and every tour derived from it; a tour
//! only owns its visiting order. Every transformation returns a new tour, so the
//! optimizer can hold on to `current` and `best` without defensive copies.

use crate::error::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named point on the plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// City name
    pub name: String,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl City {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        City { name: name.into(), x, y }
    }

    /// Euclidean distance to another city
    #[inline]
    pub fn distance(&self, other: &City) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn coords(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A closed path visiting every city of a fixed set exactly once.
#[derive(Debug, Clone)]
pub struct Tour {
    cities: Arc<[City]>,
    order: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Build a tour visiting `cities` in the given order.
    ///
    /// Fails with [`SolverError::InvalidInput`] when the sequence is empty or a
    /// coordinate is not finite. Tours of one or two cities are accepted here;
    /// the optimizer applies its own minimum.
    pub fn new(cities: Vec<City>) -> Result<Self> {
        if cities.is_empty() {
            return Err(SolverError::invalid_input("a tour needs at least one city"));
        }
        if let Some(bad) = cities.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(SolverError::invalid_input(format!(
                "city '{}' has non-finite coordinates ({}, {})",
                bad.name, bad.x, bad.y
            )));
        }

        let order = (0..cities.len()).collect();
        Ok(Self::from_parts(cities.into(), order))
    }

    fn from_parts(cities: Arc<[City]>, order: Vec<usize>) -> Self {
        let cost = Self::compute_cost(&cities, &order);
        Tour { cities, order, cost }
    }

    /// Sum of distances between every cyclically adjacent pair `(i, i-1 mod n)`.
    ///
    /// With two cities the single edge is counted twice, once per direction.
    fn compute_cost(cities: &[City], order: &[usize]) -> f64 {
        let n = order.len();
        (0..n)
            .map(|i| {
                let prev = (i + n - 1) % n;
                cities[order[i]].distance(&cities[order[prev]])
            })
            .sum()
    }

    /// Number of cities in the loop
    pub fn num_cities(&self) -> usize {
        self.order.len()
    }

    /// City at path position `pos`
    pub fn city(&self, pos: usize) -> &City {
        &self.cities[self.order[pos]]
    }

    /// Cities in path order
    pub fn cities(&self) -> impl Iterator<Item = &City> + '_ {
        self.order.iter().map(move |&i| &self.cities[i])
    }

    /// City names in path order
    pub fn names(&self) -> Vec<&str> {
        self.cities().map(|c| c.name.as_str()).collect()
    }

    /// `(x, y)` pairs in path order
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.cities().map(City::coords).collect()
    }

    /// Total Euclidean length of the closed loop
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Negated cost; higher is better
    #[inline]
    pub fn fitness(&self) -> f64 {
        -self.cost
    }

    /// Swap the city at `pos` with its predecessor (position 0 swaps with the last one).
    pub fn swap_adjacent(&self, pos: usize) -> Tour {
        let n = self.order.len();
        let mut order = self.order.clone();
        order.swap(pos % n, (pos + n - 1) % n);
        Self::from_parts(Arc::clone(&self.cities), order)
    }

    /// All tours reachable by one adjacent-position swap.
    ///
    /// Always returns exactly `n` tours; for `n <= 2` some of them coincide.
    pub fn successors(&self) -> Vec<Tour> {
        (0..self.order.len()).map(|i| self.swap_adjacent(i)).collect()
    }

    /// The same loop started `k` positions later
    pub fn rotated(&self, k: usize) -> Tour {
        let mut order = self.order.clone();
        let n = order.len();
        order.rotate_left(k % n);
        Self::from_parts(Arc::clone(&self.cities), order)
    }

    /// The same loop traversed in the opposite direction
    pub fn reversed(&self) -> Tour {
        let mut order = self.order.clone();
        order.reverse();
        Self::from_parts(Arc::clone(&self.cities), order)
    }

    /// Check that `other` visits exactly the same cities, possibly in another order
    pub fn is_permutation_of(&self, other: &Tour) -> bool {
        if self.num_cities() != other.num_cities() {
            return false;
        }
        if Arc::ptr_eq(&self.cities, &other.cities) {
            let mut a = self.order.clone();
            let mut b = other.order.clone();
            a.sort_unstable();
            b.sort_unstable();
            return a == b;
        }

        let mut remaining: Vec<&City> = other.cities().collect();
        for city in self.cities() {
            match remaining.iter().position(|c| *c == city) {
                Some(pos) => {
                    remaining.swap_remove(pos);
                }
                None => return false,
            }
        }
        remaining.is_empty()
    }
}

impl PartialEq for Tour {
    fn eq(&self, other: &Self) -> bool {
        self.num_cities() == other.num_cities() && self.cities().eq(other.cities())
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (cost {:.2})", self.names().join(" -> "), self.cost)
    }
}
