//! Module for loading and representing TSP instances.
//!
//! An instance file is a JSON object mapping each city name to its `[x, y]`
//! position, e.g. `{"Atlanta": [585.6, 376.8], "Boston": [...]}`. File order is
//! preserved and defines the initial tour. A JSON array of
//! `{"name": ..., "x": ..., "y": ...}` objects is accepted as well.

use crate::error::{Result, SolverError};
use crate::tour::{City, Tour};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum CityFile {
    Named(serde_json::Map<String, serde_json::Value>),
    List(Vec<City>),
}

/// A named set of cities in file order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Cities in the order they were supplied
    pub cities: Vec<City>,
}

impl TspInstance {
    /// Build an instance, rejecting empty sets, duplicate names and non-finite coordinates
    pub fn from_cities(name: impl Into<String>, cities: Vec<City>) -> Result<Self> {
        if cities.is_empty() {
            return Err(SolverError::invalid_input("instance contains no cities"));
        }

        let mut seen = HashSet::new();
        for city in &cities {
            if !city.x.is_finite() || !city.y.is_finite() {
                return Err(SolverError::invalid_input(format!(
                    "city '{}' has non-finite coordinates",
                    city.name
                )));
            }
            if !seen.insert(city.name.as_str()) {
                return Err(SolverError::invalid_input(format!("duplicate city '{}'", city.name)));
            }
        }

        Ok(TspInstance {
            name: name.into(),
            cities,
        })
    }

    /// Parse an instance from JSON text
    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let cities = match serde_json::from_str::<CityFile>(text)? {
            CityFile::Named(map) => {
                let mut cities = Vec::with_capacity(map.len());
                for (city_name, value) in map {
                    let (x, y): (f64, f64) = serde_json::from_value(value)?;
                    cities.push(City::new(city_name, x, y));
                }
                cities
            }
            CityFile::List(cities) => cities,
        };
        Self::from_cities(name, cities)
    }

    /// Load an instance from a JSON file; the file stem becomes the instance name
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "instance".to_string());

        let instance = Self::from_json_str(name, &text)?;
        log::info!("Loaded {} cities from {:?}", instance.dimension(), path);
        Ok(instance)
    }

    /// Keep only the first `n` cities
    pub fn truncated(&self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SolverError::invalid_input("cannot keep zero cities"));
        }
        if n > self.cities.len() {
            log::warn!(
                "Requested {} cities but {} has only {}",
                n,
                self.name,
                self.cities.len()
            );
        }
        Ok(TspInstance {
            name: self.name.clone(),
            cities: self.cities.iter().take(n).cloned().collect(),
        })
    }

    /// Number of cities
    pub fn dimension(&self) -> usize {
        self.cities.len()
    }

    /// First city of the file, used as the highlighted start of the loop
    pub fn starting_city(&self) -> Option<&City> {
        self.cities.first()
    }

    /// Tour visiting the cities in file order
    pub fn initial_tour(&self) -> Result<Tour> {
        Tour::new(self.cities.clone())
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for city in &self.cities {
            min_x = min_x.min(city.x);
            max_x = max_x.max(city.x);
            min_y = min_y.min(city.y);
            max_y = max_y.max(city.y);
        }

        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.cities.len() {
            for j in i + 1..self.cities.len() {
                distances.push(self.cities[i].distance(&self.cities[j]));
            }
        }
        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        let initial_length = self.initial_tour().map(|t| t.cost()).unwrap_or(0.0);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension(),
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            max_distance,
            initial_length,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    /// Length of the loop in file order
    pub initial_length: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(
            f,
            "  Bounds: x [{:.2}, {:.2}], y [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)?;
        writeln!(f, "  Initial loop length: {:.2}", self.initial_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPITALS: &str = r#"{
        "Sacramento": [68.4, 254.0],
        "Austin": [389.7, 448.5],
        "Boston": [946.0, 135.6],
        "Atlanta": [585.6, 376.8]
    }"#;

    #[test]
    fn test_parse_preserves_file_order() {
        let instance = TspInstance::from_json_str("capitals", CAPITALS).unwrap();
        let names: Vec<&str> = instance.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sacramento", "Austin", "Boston", "Atlanta"]);
        assert_eq!(instance.starting_city().unwrap().name, "Sacramento");
        assert_eq!(instance.cities[3].coords(), (585.6, 376.8));
    }

    #[test]
    fn test_parse_list_format() {
        let text = r#"[{"name": "a", "x": 0.0, "y": 0.0}, {"name": "b", "x": 3.0, "y": 4.0}]"#;
        let instance = TspInstance::from_json_str("list", text).unwrap();
        assert_eq!(instance.dimension(), 2);
        assert!((instance.initial_tour().unwrap().cost() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_instance_rejected() {
        let err = TspInstance::from_json_str("empty", "{}").unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn test_starting_city_of_empty_instance() {
        let built = TspInstance {
            name: "empty".to_string(),
            cities: Vec::new(),
        };
        assert!(built.starting_city().is_none());

        let deserialized: TspInstance = serde_json::from_str(r#"{"name": "x", "cities": []}"#).unwrap();
        assert!(deserialized.starting_city().is_none());
        assert!(deserialized.initial_tour().is_err());
    }

    #[test]
    fn test_malformed_coordinates_rejected() {
        let err = TspInstance::from_json_str("bad", r#"{"a": [1.0]}"#).unwrap_err();
        assert!(matches!(err, SolverError::Json(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let cities = vec![City::new("a", 0.0, 0.0), City::new("a", 1.0, 1.0)];
        let err = TspInstance::from_cities("dup", cities).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn test_truncated() {
        let instance = TspInstance::from_json_str("capitals", CAPITALS).unwrap();
        let small = instance.truncated(2).unwrap();
        assert_eq!(small.dimension(), 2);
        assert_eq!(small.cities[1].name, "Austin");
        assert_eq!(instance.truncated(10).unwrap().dimension(), 4);
        assert!(instance.truncated(0).is_err());
    }

    #[test]
    fn test_statistics() {
        let cities = vec![
            City::new("a", 0.0, 0.0),
            City::new("b", 1.0, 0.0),
            City::new("c", 1.0, 1.0),
            City::new("d", 0.0, 1.0),
        ];
        let stats = TspInstance::from_cities("square", cities).unwrap().statistics();
        assert_eq!(stats.dimension, 4);
        assert!((stats.initial_length - 4.0).abs() < 1e-12);
        assert!((stats.max_distance - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!((stats.min_x, stats.max_x), (0.0, 1.0));
        assert!(stats.to_string().contains("Cities: 4"));
    }

    #[test]
    fn test_missing_file() {
        let err = TspInstance::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, SolverError::Io(_)));
    }
}
