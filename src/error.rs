// src/error.rs
use thiserror::Error;

/// Error types for the asian-mc library
///
/// Configuration errors are raised before any random draw is made;
/// computation errors surface degenerate or non-finite intermediate results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum McError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration (unknown labels, bad counts, mismatched shapes)
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// The control payoff has (numerically) zero variance, so beta is undefined
    #[error("Degenerate control variate: control payoff variance {variance:e} is numerically zero")]
    DegenerateControlVariate { variance: f64 },

    /// Not enough observations for a sample statistic
    #[error("Insufficient samples: need at least {needed}, got {got}")]
    InsufficientSamples { needed: usize, got: usize },

    /// Numerical instability or non-finite results
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

impl McError {
    /// True for errors caught while validating inputs.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            McError::InvalidParameters { .. } | McError::InvalidConfiguration { .. }
        )
    }

    /// True for errors raised while simulating or aggregating.
    pub fn is_computation_error(&self) -> bool {
        !self.is_configuration_error()
    }
}

/// Result type alias for asian-mc operations
pub type McResult<T> = Result<T, McError>;

/// Validation utilities
pub mod validation {
    use super::{McError, McResult};

    /// Largest path count accepted by a single pricing call.
    pub const MAX_PATHS: usize = 50_000_000;
    /// Largest observation count accepted by a single pricing call.
    pub const MAX_STEPS: usize = 100_000;

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> McResult<()> {
        if !(value > 0.0) || !value.is_finite() {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> McResult<()> {
        if !value.is_finite() {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> McResult<()> {
        if paths == 0 {
            Err(McError::InvalidConfiguration {
                field: "n_sim".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > MAX_PATHS {
            Err(McError::InvalidConfiguration {
                field: "n_sim".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_PATHS),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> McResult<()> {
        if steps == 0 {
            Err(McError::InvalidConfiguration {
                field: "m_steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > MAX_STEPS {
            Err(McError::InvalidConfiguration {
                field: "m_steps".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_STEPS),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::NAN).is_err());
        assert!(validate_positive("sigma", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", -3.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_paths(0).is_err());
        assert!(validate_paths(MAX_PATHS + 1).is_err());
        assert!(validate_steps(252).is_ok());
        assert!(validate_steps(0).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = McError::InvalidParameters {
            parameter: "sigma".to_string(),
            value: -0.1,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("sigma"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_error_classification() {
        let config = McError::InvalidConfiguration {
            field: "obs_freq".to_string(),
            reason: "unknown label".to_string(),
        };
        assert!(config.is_configuration_error());
        assert!(!config.is_computation_error());

        let degenerate = McError::DegenerateControlVariate { variance: 0.0 };
        assert!(degenerate.is_computation_error());
        assert!(degenerate.to_string().contains("Degenerate control variate"));

        let short = McError::InsufficientSamples { needed: 2, got: 1 };
        assert!(short.is_computation_error());
        assert!(short.to_string().contains("at least 2"));
    }
}
