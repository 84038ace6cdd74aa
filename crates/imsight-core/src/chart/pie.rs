//! Pie and donut charts

use super::{
    category_of, no_data, resolve_palette, stats_error, validate_frame, ChartKind, NumericSource,
};
use crate::error::{ChartError, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::OrdinalScale;
use imsight_io::{Record, RecordSet};
use imsight_stats::{group_by, mean, round_percentage, weighted_table};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// What a slice measures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieMetric {
    /// Number of records per category
    #[default]
    Count,

    /// Sum of a numeric value per category
    Sum(NumericSource),

    /// Mean of a numeric value per category
    Mean(NumericSource),
}

impl PieMetric {
    fn source(&self) -> Option<&NumericSource> {
        match self {
            PieMetric::Count => None,
            PieMetric::Sum(source) | PieMetric::Mean(source) => Some(source),
        }
    }
}

/// One slice per distinct value of a categorical field
///
/// Slices keep first-occurrence order of their categories, clockwise from
/// twelve o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSpec {
    pub field: String,
    #[serde(default)]
    pub metric: PieMetric,
    /// Inner radius as a fraction of the outer radius; 0 draws a pie
    #[serde(default)]
    pub inner_radius_ratio: f64,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    /// Records that contributed to the slice
    pub count: usize,
    pub value: f64,
    /// Exact share of the total
    pub fraction: f64,
    /// Share of the total in percent, one decimal place
    pub percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Label anchor relative to the pie center
    pub centroid: [f64; 2],
    pub color: Option<Color>,
}

/// A built pie chart
#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    pub slices: Vec<Slice>,
    /// Pie center in plot-area coordinates
    pub center: [f64; 2],
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub total: f64,
    /// Categories whose value is undefined (no numeric observations)
    pub undefined: Vec<String>,
    pub skipped: usize,
    pub frame: Frame,
}

impl PieSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            metric: PieMetric::Count,
            inner_radius_ratio: 0.0,
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn with_metric(mut self, metric: PieMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Draw a donut with the given inner radius fraction
    pub fn donut(mut self, ratio: f64) -> Self {
        self.inner_radius_ratio = ratio;
        self
    }

    pub fn with_palette(mut self, palette: impl Into<PaletteSpec>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.field.as_str()];
        if let Some(source) = self.metric.source() {
            fields.extend(source.header_field());
        }
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(0.0..1.0).contains(&self.inner_radius_ratio) {
            return Err(ChartError::InvalidConfig(format!(
                "inner_radius_ratio must be within [0, 1), got {}",
                self.inner_radius_ratio
            )));
        }
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    /// Per-category `(label, count, value)` rows plus undefined labels and
    /// skipped records
    fn aggregate(
        &self,
        records: &RecordSet,
    ) -> ChartResult<(Vec<(String, usize, f64)>, Vec<String>, usize)> {
        let key = |r: &&Record| category_of(r, &self.field);

        match &self.metric {
            PieMetric::Count => {
                let grouping = group_by(records, key);
                let skipped = grouping.skipped();
                let rows = grouping
                    .into_iter()
                    .map(|g| {
                        let count = g.len();
                        (g.key, count, count as f64)
                    })
                    .collect();
                Ok((rows, Vec::new(), skipped))
            }
            PieMetric::Sum(source) => {
                let table = weighted_table(records, key, |r| source.value(r))
                    .map_err(stats_error(ChartKind::Pie))?;
                let rows = table
                    .entries
                    .into_iter()
                    .map(|e| (e.key, e.count, e.value))
                    .collect();
                Ok((rows, Vec::new(), table.skipped))
            }
            PieMetric::Mean(source) => {
                let grouping = group_by(records, key);
                let mut skipped = grouping.skipped();
                let mut rows = Vec::new();
                let mut undefined = Vec::new();

                for group in grouping {
                    let values: Vec<f64> =
                        group.members.iter().filter_map(|r| source.value(r)).collect();
                    skipped += group.len() - values.len();
                    match mean(&values) {
                        Some(m) => rows.push((group.key, values.len(), m)),
                        None => undefined.push(group.key),
                    }
                }
                Ok((rows, undefined, skipped))
            }
        }
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<PieChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;
        let (rows, undefined, skipped) = self.aggregate(records)?;

        let total: f64 = rows.iter().map(|(_, _, value)| value).sum();
        if rows.is_empty() || total <= 0.0 || !total.is_finite() {
            return Err(no_data(ChartKind::Pie));
        }
        if let Some((label, _, _)) = rows.iter().find(|(_, _, value)| *value < 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "negative slice value for '{}'",
                label
            )));
        }

        let outer_radius = self.frame.radius();
        let inner_radius = outer_radius * self.inner_radius_ratio;
        let label_radius = (inner_radius + outer_radius) / 2.0;
        let color = OrdinalScale::new(rows.iter().map(|(label, ..)| label.clone()), palette.colors);

        let last = rows.len() - 1;
        let mut cursor = 0.0;
        let slices = rows
            .into_iter()
            .enumerate()
            .map(|(i, (label, count, value))| {
                let fraction = value / total;
                let start_angle = cursor;
                let end_angle = if i == last {
                    TAU
                } else {
                    cursor + fraction * TAU
                };
                cursor = end_angle;

                let mid = (start_angle + end_angle) / 2.0;
                Slice {
                    color: color.map(&label).copied(),
                    label,
                    count,
                    value,
                    fraction,
                    percentage: round_percentage(fraction),
                    start_angle,
                    end_angle,
                    centroid: [label_radius * mid.sin(), -label_radius * mid.cos()],
                }
            })
            .collect();

        if !undefined.is_empty() {
            tracing::debug!(field = %self.field, ?undefined, "Categories without a defined value");
        }

        Ok(PieChart {
            slices,
            center: self.frame.center(),
            inner_radius,
            outer_radius,
            total,
            undefined,
            skipped,
            frame: self.frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures;

    #[test]
    fn test_count_pie_angles_cover_circle() {
        let chart = PieSpec::new("Avenue").build(&fixtures::investors()).unwrap();

        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Mutual Fund", "Equity", "Fixed Deposits"]);
        assert_eq!(chart.slices[0].start_angle, 0.0);
        assert_eq!(chart.slices.last().unwrap().end_angle, TAU);
        for pair in chart.slices.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }

        let fractions: f64 = chart.slices.iter().map(|s| s.fraction).sum();
        assert!((fractions - 1.0).abs() < 1e-9);
        assert_eq!(chart.slices[1].percentage, 50.0);
        assert_eq!(chart.total, 6.0);
    }

    #[test]
    fn test_donut_radii_and_centroid() {
        let chart = PieSpec::new("gender")
            .donut(0.5)
            .build(&fixtures::investors())
            .unwrap();

        assert_eq!(chart.outer_radius, 165.0);
        assert_eq!(chart.inner_radius, 82.5);

        // Female holds the first third; its label sits at 60 degrees
        let female = &chart.slices[0];
        let r = (82.5 + 165.0) / 2.0;
        assert!((female.centroid[0] - r * (TAU / 6.0).sin()).abs() < 1e-9);
        assert!((female.centroid[1] + r * (TAU / 6.0).cos()).abs() < 1e-9);
    }

    #[test]
    fn test_mean_pie_reports_undefined_groups() {
        let chart = PieSpec::new("Continent")
            .with_metric(PieMetric::Mean(NumericSource::latest(
                fixtures::forest_series(),
            )))
            .with_palette("set2")
            .build(&fixtures::countries())
            .unwrap();

        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["South America", "Europe", "Asia", "Africa"]);
        assert!((chart.slices[0].value - (97.4 + 65.9) / 2.0).abs() < 1e-9);
        assert_eq!(chart.undefined, vec![""]);
        assert_eq!(chart.skipped, 1);
        assert_eq!(chart.slices[0].color.unwrap().to_hex(), "#66C2A5");
    }

    #[test]
    fn test_all_zero_values_is_no_data() {
        let records = RecordSet::from_records(vec![
            Record::new().with("k", "a").with("v", "0"),
            Record::new().with("k", "b").with("v", "0"),
        ]);
        let err = PieSpec::new("k")
            .with_metric(PieMetric::Sum(NumericSource::from("v")))
            .build(&records)
            .unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_empty_records_is_no_data() {
        let err = PieSpec::new("Avenue").build(&RecordSet::default()).unwrap_err();
        assert!(err.is_no_data());
    }
}
