//! Scales mapping data values to chart coordinates
//!
//! Continuous scales ([`LinearScale`], [`SqrtScale`]) interpolate between a
//! numeric domain and a pixel range. Discrete scales assign categories to
//! slots: [`BandScale`] to padded, equal-width bands and [`OrdinalScale`] to
//! palette entries by position.
//!
//! Every scale is fixed at construction and mapping is a pure function.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::hash::Hash;

/// Interpolate between two range endpoints, exact at `t = 0` and `t = 1`
fn interpolate(r0: f64, r1: f64, t: f64) -> f64 {
    r0 * (1.0 - t) + r1 * t
}

/// A labelled tick on a continuous axis
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    /// Position in data coordinates
    pub value: f64,

    /// Position in range (pixel) coordinates
    pub position: f64,

    pub label: String,
}

/// Upper bound on the ticks one axis can produce
const MAX_TICKS: i128 = 1_000;

/// Largest band padding; every band keeps a nonzero width
const MAX_BAND_PADDING: f64 = 1.0 - f64::EPSILON;

/// Linear mapping from a numeric domain onto a numeric range
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Create a linear scale
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Create a scale over `[0, max]`
    pub fn from_zero(max: f64, range: [f64; 2]) -> Self {
        Self::new([0.0, max], range)
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Check if the domain is a single point
    pub fn is_degenerate(&self) -> bool {
        self.domain[0] == self.domain[1]
    }

    /// Map a domain value to the range
    ///
    /// Values outside the domain extrapolate. A degenerate domain maps
    /// everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        interpolate(r0, r1, (value - d0) / (d1 - d0))
    }

    /// Map a range position back to the domain
    pub fn invert(&self, position: f64) -> Option<f64> {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r0 == r1 {
            return None;
        }
        Some(interpolate(d0, d1, (position - r0) / (r1 - r0)))
    }

    /// Roughly `count` ticks at round values within the domain
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let min = self.domain[0].min(self.domain[1]);
        let max = self.domain[0].max(self.domain[1]);
        let span = max - min;
        if count == 0 || !span.is_finite() || span <= 0.0 {
            return vec![];
        }

        let step = nice_step(span / count as f64);
        if !step.is_normal() || !(1.0 / step).is_finite() {
            return vec![];
        }
        let first = (min / step).ceil() as i64;
        let last = (max / step + 0.001).floor() as i64;
        if last < first || (last as i128 - first as i128) > MAX_TICKS {
            return vec![];
        }

        (first..=last)
            .map(|i| {
                // Dividing by the inverse keeps fractional steps free of drift
                let value = if step >= 1.0 {
                    i as f64 * step
                } else {
                    i as f64 / (1.0 / step).round()
                };
                Tick {
                    value,
                    position: self.map(value),
                    label: format_number(value),
                }
            })
            .collect()
    }
}

/// Round a raw step to 1, 2 or 5 times a power of ten
fn nice_step(rough_step: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough_step.abs().log10().floor());
    let residual = rough_step / magnitude;

    if residual <= 1.5 {
        magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

/// Format a tick value for display
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e6 || value.abs() < 0.01 {
        format!("{:.2e}", value)
    } else if value.fract().abs() < 1e-10 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn signed_sqrt(value: f64) -> f64 {
    value.signum() * value.abs().sqrt()
}

/// Square-root mapping, used for area-proportional radii
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SqrtScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl SqrtScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Create a scale over `[0, max]`
    pub fn from_zero(max: f64, range: [f64; 2]) -> Self {
        Self::new([0.0, max], range)
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a domain value to the range
    pub fn map(&self, value: f64) -> f64 {
        let d0 = signed_sqrt(self.domain[0]);
        let d1 = signed_sqrt(self.domain[1]);
        let [r0, r1] = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        interpolate(r0, r1, (signed_sqrt(value) - d0) / (d1 - d0))
    }
}

/// Ordered categories mapped onto equal-width padded slots
///
/// Slot `i` starts at `r0 + i * step + step * padding / 2` where
/// `step = (r1 - r0) / n`; each slot is `step * (1 - padding)` wide, so the
/// slots and their gaps tile the range exactly.
#[derive(Clone, Debug, Serialize)]
pub struct BandScale<K> {
    domain: IndexSet<K>,
    range: [f64; 2],
    padding: f64,
}

impl<K: Hash + Eq> BandScale<K> {
    /// Create a band scale; duplicate categories keep their first position
    pub fn new(domain: impl IntoIterator<Item = K>, range: [f64; 2], padding: f64) -> Self {
        let padding = if padding.is_nan() {
            0.0
        } else {
            padding.clamp(0.0, MAX_BAND_PADDING)
        };
        Self {
            domain: domain.into_iter().collect(),
            range,
            padding,
        }
    }

    /// Categories in slot order
    pub fn domain(&self) -> impl Iterator<Item = &K> {
        self.domain.iter()
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Distance between the starts of adjacent slots
    pub fn step(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        (self.range[1] - self.range[0]) / self.domain.len() as f64
    }

    /// Width of each slot
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Slot index of a category
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.domain.get_index_of(key)
    }

    /// Start of slot `index`
    pub fn position(&self, index: usize) -> f64 {
        let step = self.step();
        self.range[0] + index as f64 * step + step * self.padding / 2.0
    }

    /// Start of a category's slot
    pub fn map<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of(key).map(|i| self.position(i))
    }

    /// Middle of a category's slot
    pub fn center<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map(key).map(|start| start + self.bandwidth() / 2.0)
    }
}

/// Categories mapped onto a finite palette by first-seen position
///
/// The k-th category gets entry `k mod palette.len()`.
#[derive(Clone, Debug, Serialize)]
pub struct OrdinalScale<K, V> {
    domain: IndexSet<K>,
    palette: Vec<V>,
}

impl<K: Hash + Eq, V> OrdinalScale<K, V> {
    pub fn new(domain: impl IntoIterator<Item = K>, palette: Vec<V>) -> Self {
        Self {
            domain: domain.into_iter().collect(),
            palette,
        }
    }

    pub fn domain(&self) -> impl Iterator<Item = &K> {
        self.domain.iter()
    }

    pub fn palette(&self) -> &[V] {
        &self.palette
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Palette entry for a category; `None` for unknown categories or an
    /// empty palette
    pub fn map<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.palette.is_empty() {
            return None;
        }
        let index = self.domain.get_index_of(key)?;
        self.palette.get(index % self.palette.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_linear_endpoints_exact() {
        let scale = LinearScale::new([0.0, 37.0], [400.0, 0.0]);
        assert_eq!(scale.map(0.0), 400.0);
        assert_eq!(scale.map(37.0), 0.0);
        assert!((scale.map(18.5) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_degenerate_domain_maps_to_middle() {
        let scale = LinearScale::new([5.0, 5.0], [0.0, 300.0]);
        assert!(scale.is_degenerate());
        assert_eq!(scale.map(5.0), 150.0);
        assert_eq!(scale.map(-100.0), 150.0);
    }

    #[test]
    fn test_linear_invert() {
        let scale = LinearScale::from_zero(100.0, [0.0, 500.0]);
        assert!((scale.invert(250.0).unwrap() - 50.0).abs() < 1e-9);
        assert!(LinearScale::new([0.0, 1.0], [3.0, 3.0]).invert(3.0).is_none());
    }

    #[rstest]
    #[case([0.0, 100.0], 5, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0])]
    #[case([0.0, 1.0], 5, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0])]
    #[case([3.0, 17.0], 5, vec![4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0])]
    fn test_linear_ticks(
        #[case] domain: [f64; 2],
        #[case] count: usize,
        #[case] expected: Vec<f64>,
    ) {
        let ticks = LinearScale::new(domain, [0.0, 1.0]).ticks(count);
        let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_tick_labels_and_positions() {
        let ticks = LinearScale::from_zero(100.0, [400.0, 0.0]).ticks(5);
        assert_eq!(ticks[1].label, "20");
        assert!((ticks[1].position - 320.0).abs() < 1e-9);
        assert!(LinearScale::new([1.0, 1.0], [0.0, 1.0]).ticks(5).is_empty());
    }

    #[test]
    fn test_ticks_on_subnormal_span_are_empty() {
        assert!(LinearScale::new([0.0, 5e-324], [0.0, 1.0]).ticks(5).is_empty());
        assert!(LinearScale::new([0.0, 1e-310], [0.0, 1.0]).ticks(5).is_empty());
    }

    #[test]
    fn test_tick_count_is_bounded() {
        assert!(LinearScale::new([0.0, 1.0], [0.0, 1.0]).ticks(100_000).is_empty());
        assert_eq!(LinearScale::new([0.0, 1.0], [0.0, 1.0]).ticks(500).len(), 501);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(2.5e7), "2.50e7");
    }

    #[test]
    fn test_sqrt_scale_area_proportional() {
        let scale = SqrtScale::from_zero(100.0, [5.0, 30.0]);
        assert_eq!(scale.map(0.0), 5.0);
        assert_eq!(scale.map(100.0), 30.0);
        // sqrt(25) / sqrt(100) = 0.5
        assert!((scale.map(25.0) - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_sqrt_scale_degenerate() {
        let scale = SqrtScale::from_zero(0.0, [5.0, 30.0]);
        assert_eq!(scale.map(0.0), 17.5);
    }

    #[test]
    fn test_band_scale_slots() {
        let scale = BandScale::new(["Male", "Female"], [0.0, 420.0], 0.1);
        assert_eq!(scale.len(), 2);
        assert!((scale.step() - 210.0).abs() < 1e-9);
        assert!((scale.bandwidth() - 189.0).abs() < 1e-9);
        assert!((scale.map("Male").unwrap() - 10.5).abs() < 1e-9);
        assert!((scale.map("Female").unwrap() - 220.5).abs() < 1e-9);
        assert!((scale.center("Male").unwrap() - 105.0).abs() < 1e-9);
        assert!(scale.map("Other").is_none());
    }

    #[test]
    fn test_band_scale_deduplicates_in_first_seen_order() {
        let scale = BandScale::new(
            vec!["b".to_string(), "a".to_string(), "b".to_string()],
            [0.0, 100.0],
            0.0,
        );
        let domain: Vec<&String> = scale.domain().collect();
        assert_eq!(domain, vec!["b", "a"]);
        assert_eq!(scale.index_of("a"), Some(1));
    }

    #[test]
    fn test_band_scale_clamps_padding() {
        let scale = BandScale::new([1, 2], [0.0, 1.0], 1.5);
        assert!(scale.padding() < 1.0);
        assert!(scale.bandwidth() > 0.0);
        assert_eq!(BandScale::new([1, 2], [0.0, 1.0], f64::NAN).padding(), 0.0);
        assert_eq!(BandScale::<i32>::new([], [0.0, 1.0], 0.1).bandwidth(), 0.0);
    }

    #[test]
    fn test_ordinal_scale_wraps() {
        let scale = OrdinalScale::new(["a", "b", "c"], vec!["red", "blue"]);
        assert_eq!(scale.map("a"), Some(&"red"));
        assert_eq!(scale.map("b"), Some(&"blue"));
        assert_eq!(scale.map("c"), Some(&"red"));
        assert_eq!(scale.map("d"), None);

        let empty: OrdinalScale<&str, &str> = OrdinalScale::new(["a"], vec![]);
        assert_eq!(empty.map("a"), None);
    }
}
