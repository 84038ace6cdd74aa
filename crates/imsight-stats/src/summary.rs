//! Summary statistics for groups of numeric values
//!
//! Provides:
//! - Mean and sum
//! - Linear-interpolation quantiles over sorted values
//! - The five-number summary (min, Q1, median, Q3, max) for box plots
//! - Dispersion statistics (variance, standard deviation, MAD)
//!
//! Every function returns `None` for zero observations.

use serde::{Deserialize, Serialize};

/// Arithmetic mean of the finite values
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sum of the finite values
pub fn sum(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        None
    } else {
        Some(finite.iter().sum())
    }
}

/// Sort values ascending by numeric order, dropping non-finite values
///
/// The sort is stable.
pub fn sort_numeric(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of already-sorted values by linear interpolation
///
/// Interpolates between the two sorted values bracketing the fractional
/// rank `p * (n - 1)`. `p` is clamped to [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || p.is_nan() {
        return None;
    }

    let p = p.clamp(0.0, 1.0);
    let rank = p * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = rank - lower as f64;

    let a = sorted[lower];
    let b = sorted[upper];
    if frac == 0.0 {
        Some(a)
    } else {
        Some(a + (b - a) * frac)
    }
}

/// Quantile of unsorted values
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sort_numeric(values), p)
}

/// Five number summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Compute the summary of unsorted values
    pub fn from_data(values: &[f64]) -> Option<Self> {
        Self::from_sorted(&sort_numeric(values))
    }

    /// Compute the summary of values already sorted ascending
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let min = *sorted.first()?;
        let max = *sorted.last()?;

        Some(Self {
            min,
            q1: quantile_sorted(sorted, 0.25)?,
            median: quantile_sorted(sorted, 0.5)?,
            q3: quantile_sorted(sorted, 0.75)?,
            max,
        })
    }

    /// Get the interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Get the range
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Lower fence for outlier detection (Q1 - 1.5 * IQR)
    pub fn lower_fence(&self) -> f64 {
        self.q1 - 1.5 * self.iqr()
    }

    /// Upper fence for outlier detection (Q3 + 1.5 * IQR)
    pub fn upper_fence(&self) -> f64 {
        self.q3 + 1.5 * self.iqr()
    }

    /// Check if a value lies outside the fences
    pub fn is_outlier(&self, x: f64) -> bool {
        x < self.lower_fence() || x > self.upper_fence()
    }
}

/// Summary statistics for a numeric dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing/NaN values
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    pub std_dev: f64,
    pub median: f64,
    /// Median Absolute Deviation
    pub mad: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data
    ///
    /// Returns `None` when there is no finite value.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let sorted = sort_numeric(data);
        let count = sorted.len();
        let missing = data.len() - count;

        let mean = mean(&sorted)?;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;
        let median = quantile_sorted(&sorted, 0.5)?;

        let deviations: Vec<f64> = sorted.iter().map(|x| (x - median).abs()).collect();
        let mad = quantile(&deviations, 0.5)?;

        Some(Self {
            count,
            missing,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            variance,
            std_dev: variance.sqrt(),
            median,
            mad,
        })
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Compute the z-score of a value; `None` when the spread is zero
    pub fn zscore(&self, x: f64) -> Option<f64> {
        if self.std_dev == 0.0 {
            return None;
        }
        Some((x - self.mean) / self.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sum() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(sum(&[1.0, 2.0, f64::NAN]), Some(3.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(sum(&[f64::NAN]), None);
    }

    #[test]
    fn test_sort_numeric_not_lexicographic() {
        let sorted = sort_numeric(&[10.0, 9.0, 100.0, -1.0, f64::INFINITY]);
        assert_eq!(sorted, vec![-1.0, 9.0, 10.0, 100.0]);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // rank 0.75 between 1 and 2
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&sorted, 2.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_single_element() {
        for p in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_eq!(quantile_sorted(&[7.5], p), Some(7.5));
        }
    }

    #[test]
    fn test_five_number_summary_exact_on_five() {
        let summary = FiveNumberSummary::from_data(&[5.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.iqr(), 2.0);
        assert_eq!(summary.lower_fence(), -1.0);
        assert_eq!(summary.upper_fence(), 7.0);
        assert!(summary.is_outlier(8.0));
        assert!(!summary.is_outlier(6.0));
    }

    #[test]
    fn test_five_number_summary_empty() {
        assert!(FiveNumberSummary::from_data(&[]).is_none());
        assert!(FiveNumberSummary::from_data(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_summary_stats_basic() {
        let data: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let stats = SummaryStats::from_data(&data).unwrap();

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert!((stats.mean - 5.5).abs() < 1e-10);
        assert!((stats.median - 5.5).abs() < 1e-10);
        assert_eq!(stats.range(), 9.0);
    }

    #[test]
    fn test_summary_stats_with_nan() {
        let data = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
        let stats = SummaryStats::from_data(&data).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_summary_stats_empty_and_zscore() {
        assert!(SummaryStats::from_data(&[]).is_none());

        let flat = SummaryStats::from_data(&[2.0, 2.0]).unwrap();
        assert_eq!(flat.zscore(3.0), None);

        let stats = SummaryStats::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((stats.zscore(3.0).unwrap()).abs() < 1e-10);
    }
}
