//! Error types for imsight-core
//!
//! Chart builders report failures through [`ChartError`]; dashboard
//! configuration problems surface as [`ConfigError`].

use crate::chart::ChartKind;
use imsight_stats::StatsError;
use thiserror::Error;

/// Errors raised while building a chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// Nothing left to draw after filtering and parsing
    #[error("No data to display for {chart} chart")]
    NoData { chart: ChartKind },

    /// A referenced column is absent from the record set header
    #[error("Field '{field}' not found in dataset")]
    FieldNotFound { field: String },

    /// Chart parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Aggregation failed
    #[error("Aggregation failed: {0}")]
    Stats(#[from] StatsError),
}

impl ChartError {
    /// Whether the error is the empty-state signal rather than a failure
    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartError::NoData { .. })
    }
}

/// Errors in dashboard configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML or JSON could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// TOML or JSON could not be produced
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Configuration parsed but is inconsistent
    #[error("Invalid configuration for '{chart}': {message}")]
    Invalid { chart: String, message: String },

    /// A config file could not be read
    #[error("Failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type alias for chart building
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type alias for configuration handling
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate that a field is declared in the header
    pub fn validate_field_exists(field: &str, available: &[String]) -> ChartResult<()> {
        if !available.iter().any(|f| f == field) {
            return Err(ChartError::FieldNotFound {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// Validate a band padding fraction
    pub fn validate_padding(padding: f64) -> ChartResult<()> {
        if !(0.0..1.0).contains(&padding) {
            return Err(ChartError::InvalidConfig(format!(
                "padding must be within [0, 1), got {}",
                padding
            )));
        }
        Ok(())
    }

    /// Validate a count parameter that must be at least one
    pub fn validate_positive(name: &str, value: usize) -> ChartResult<()> {
        if value == 0 {
            return Err(ChartError::InvalidConfig(format!(
                "{} must be at least 1",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_error_display() {
        let err = ChartError::NoData {
            chart: ChartKind::Pie,
        };
        assert_eq!(err.to_string(), "No data to display for pie chart");
        assert!(err.is_no_data());

        let err = ChartError::FieldNotFound {
            field: "Avenue".to_string(),
        };
        assert!(err.to_string().contains("Avenue"));
        assert!(!err.is_no_data());
    }

    #[test]
    fn test_stats_error_converts() {
        let err: ChartError = StatsError::InvalidBinCount(0).into();
        assert!(matches!(err, ChartError::Stats(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            chart: "gender".to_string(),
            message: "padding must be within [0, 1)".to_string(),
        };
        assert!(err.to_string().contains("gender"));
    }

    #[test]
    fn test_validate_field_exists() {
        let fields = vec!["gender".to_string(), "age".to_string()];
        assert!(validation::validate_field_exists("age", &fields).is_ok());
        assert!(validation::validate_field_exists("Avenue", &fields).is_err());
    }

    #[test]
    fn test_validate_padding() {
        assert!(validation::validate_padding(0.1).is_ok());
        assert!(validation::validate_padding(0.0).is_ok());
        assert!(validation::validate_padding(1.0).is_err());
        assert!(validation::validate_padding(-0.1).is_err());
        assert!(validation::validate_padding(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validation::validate_positive("bins", 20).is_ok());
        assert!(validation::validate_positive("bins", 0).is_err());
    }
}
