//! Error types for imsight-stats

use thiserror::Error;

/// Errors raised while aggregating values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Nothing to aggregate (zero records or a zero grand total)
    #[error("No data to aggregate")]
    EmptyDataset,

    /// Histograms need at least one bin
    #[error("Invalid bin count: {0} (must be at least 1)")]
    InvalidBinCount(usize),

    /// Domain bounds must be finite with lo <= hi
    #[error("Invalid domain [{lo}, {hi}]")]
    InvalidDomain { lo: f64, hi: f64 },
}

/// Result type alias for aggregation operations
pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_display() {
        assert_eq!(StatsError::EmptyDataset.to_string(), "No data to aggregate");
        assert!(StatsError::InvalidBinCount(0).to_string().contains('0'));

        let err = StatsError::InvalidDomain { lo: 5.0, hi: 1.0 };
        assert!(err.to_string().contains("[5, 1]"));
    }
}
