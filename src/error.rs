//! Error types for the TSP annealing solver.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;

/// Solver error types
#[derive(Error, Debug)]
pub enum SolverError {
    /// The city sequence cannot form a usable tour
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The annealing schedule constants are inconsistent
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The injected random source could not produce a value
    #[error("Random source failure: {0}")]
    SourceFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON instance or report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Trace export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SolverError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SolverError::InvalidInput(msg.into())
    }

    /// Whether the error comes from bad caller input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(self, SolverError::InvalidInput(_) | SolverError::InvalidSchedule(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SolverError::invalid_input("no cities");
        assert_eq!(err.to_string(), "Invalid input: no cities");
        assert!(err.is_input_error());

        let err = SolverError::SourceFailure("exhausted".to_string());
        assert_eq!(err.to_string(), "Random source failure: exhausted");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SolverError = io.into();
        assert!(matches!(err, SolverError::Io(_)));
    }
}
