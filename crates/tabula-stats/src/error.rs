//! Error types for tabula-stats

use thiserror::Error;

/// Errors raised by statistical computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// No values were supplied
    #[error("No values supplied")]
    EmptySample,

    /// Too few values for an N-1 estimator
    #[error("Need at least {needed} values, got {got}")]
    DegenerateSample { needed: usize, got: usize },

    /// Paired inputs differ in length
    #[error("Unequal length inputs: {left} vs {right}")]
    UnequalLength { left: usize, right: usize },

    /// Argument outside the function's domain
    #[error("Invalid {parameter}: {value} is outside the function's domain")]
    InvalidDomain { parameter: &'static str, value: f64 },

    /// All x values identical so the slope is undefined
    #[error("Unable to calculate linear regression: all x values are identical")]
    SingularRegression,

    /// A sample handed to a hypothesis test is too small
    #[error("Sample '{label}' needs at least {needed} values, got {got}")]
    TooFewSamples {
        label: String,
        needed: usize,
        got: usize,
    },

    /// Zero spread makes the test statistic undefined
    #[error("Insufficient variability in at least one variable")]
    InadequateVariability,
}

/// Result type alias for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_display() {
        let err = StatsError::DegenerateSample { needed: 2, got: 1 };
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_invalid_domain_display() {
        let err = StatsError::InvalidDomain {
            parameter: "x",
            value: 1.5,
        };
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_too_few_samples_display() {
        let err = StatsError::TooFewSamples {
            label: "Girls".to_string(),
            needed: 2,
            got: 1,
        };
        assert!(err.to_string().contains("Girls"));
    }
}
