//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A ratio threshold lies outside `[0, 1]`.
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f32 },

    /// A value that must be a non-negative finite number is not.
    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f32 },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a ratio threshold lies in `[0, 1]`.
    fn validate_threshold(&self, field: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::ThresholdOutOfRange { field, value })
        }
    }

    /// Validates that a length (tolerance, padding) is finite and non-negative.
    fn validate_non_negative(&self, field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NegativeValue { field, value })
        }
    }
}
