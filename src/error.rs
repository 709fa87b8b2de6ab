//! Error types for instrument validation, input loading and calibration

use thiserror::Error;

/// Result alias for instrument construction
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Result alias for the calibration solver
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Result alias for CSV loaders
pub type LoadResult<T> = Result<T, LoadError>;

/// Domain violations rejected when an equity record is constructed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    #[error("asset {asset_id}: payment frequency {frequency} does not divide 12")]
    InvalidFrequency { asset_id: u32, frequency: u32 },

    #[error("asset {asset_id}: dividend yield must be non-negative, got {value}")]
    NegativeDividendYield { asset_id: u32, value: f64 },

    #[error("asset {asset_id}: market price must be non-negative, got {value}")]
    NegativeMarketPrice { asset_id: u32, value: f64 },

    #[error("asset {asset_id}: {field} is not a finite number")]
    NonFinite { asset_id: u32, field: &'static str },
}

/// Failures of the growth-rate solver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Iteration cap reached without meeting the stopping criterion
    #[error("bisection did not converge after {iterations} iterations (bracket [{lower}, {upper}])")]
    NotConverged { iterations: u32, lower: f64, upper: f64 },

    #[error("bisection timed out after {iterations} iterations")]
    TimedOut { iterations: u32 },

    #[error("invalid calibration input: {reason}")]
    InvalidInput { reason: String },
}

impl CalibrationError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading equity, settings or curve files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid value for {field}: '{value}'")]
    InvalidField { field: String, value: String },

    #[error("missing setting: {0}")]
    MissingSetting(String),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error("invalid yield curve: {0}")]
    Curve(#[from] CalibrationError),
}

impl LoadError {
    pub(crate) fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InstrumentError::InvalidFrequency {
            asset_id: 7,
            frequency: 5,
        };
        assert_eq!(err.to_string(), "asset 7: payment frequency 5 does not divide 12");

        let err = CalibrationError::NotConverged {
            iterations: 10,
            lower: 0.0,
            upper: 0.5,
        };
        assert!(err.to_string().contains("10 iterations"));
    }
}
