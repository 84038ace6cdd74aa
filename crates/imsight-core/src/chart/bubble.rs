//! Bubble charts: one bubble per category, sized by record count

use super::{
    category_of, default_band_padding, no_data, resolve_palette, validate_frame, ChartKind,
    NumericSource,
};
use crate::error::{validation, ChartError, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{BandScale, LinearScale, OrdinalScale, SqrtScale, Tick};
use imsight_io::{Record, RecordSet};
use imsight_stats::{group_by, mean};
use serde::{Deserialize, Serialize};

fn default_radius_range() -> [f64; 2] {
    [5.0, 30.0]
}

/// Bubbles placed on a category axis at the mean of a numeric value
///
/// The bubble area grows with the number of records in the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleSpec {
    pub group_field: String,
    /// Value averaged for the vertical position
    pub value: NumericSource,
    #[serde(default = "default_radius_range")]
    pub radius_range: [f64; 2],
    #[serde(default = "default_band_padding")]
    pub padding: f64,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready bubble
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub label: String,
    /// Records in the category
    pub count: usize,
    /// Mean value; `None` when no record in the category has one
    pub mean: Option<f64>,
    pub cx: f64,
    pub cy: Option<f64>,
    pub r: f64,
    pub color: Option<Color>,
}

/// A built bubble chart
#[derive(Debug, Clone, Serialize)]
pub struct BubbleChart {
    pub bubbles: Vec<Bubble>,
    pub x: BandScale<String>,
    pub y: LinearScale,
    pub y_ticks: Vec<Tick>,
    pub radius: SqrtScale,
    pub skipped: usize,
    pub frame: Frame,
}

impl BubbleSpec {
    pub fn new(group_field: impl Into<String>, value: NumericSource) -> Self {
        Self {
            group_field: group_field.into(),
            value,
            radius_range: default_radius_range(),
            padding: default_band_padding(),
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn with_radius_range(mut self, min: f64, max: f64) -> Self {
        self.radius_range = [min, max];
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.group_field.as_str()];
        fields.extend(self.value.header_field());
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        let [min, max] = self.radius_range;
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
            return Err(ChartError::InvalidConfig(format!(
                "radius range must satisfy 0 <= min <= max, got [{}, {}]",
                min, max
            )));
        }
        validation::validate_padding(self.padding)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<BubbleChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let grouping = group_by(records, |r: &&Record| category_of(r, &self.group_field));
        if grouping.is_empty() {
            return Err(no_data(ChartKind::Bubble));
        }
        let mut skipped = grouping.skipped();

        // (label, count, mean)
        let rows: Vec<(String, usize, Option<f64>)> = grouping
            .into_iter()
            .map(|g| {
                let values: Vec<f64> = g.members.iter().filter_map(|r| self.value.value(r)).collect();
                skipped += g.len() - values.len();
                (g.key, g.members.len(), mean(&values))
            })
            .collect();

        let max_count = rows.iter().map(|(_, count, _)| *count).max().unwrap_or(0);
        let max_mean = rows
            .iter()
            .filter_map(|(_, _, m)| *m)
            .fold(0.0, f64::max);

        let x = BandScale::new(
            rows.iter().map(|(label, ..)| label.clone()),
            self.frame.x_range(),
            self.padding,
        );
        let y = LinearScale::from_zero(max_mean, self.frame.y_range());
        let radius = SqrtScale::from_zero(max_count as f64, self.radius_range);
        let color = OrdinalScale::new(x.domain().cloned(), palette.colors);

        let bubbles = rows
            .into_iter()
            .enumerate()
            .map(|(i, (label, count, m))| Bubble {
                cx: x.position(i) + x.bandwidth() / 2.0,
                cy: m.map(|m| y.map(m)),
                r: radius.map(count as f64),
                color: color.map(&label).copied(),
                label,
                count,
                mean: m,
            })
            .collect();

        Ok(BubbleChart {
            bubbles,
            y_ticks: y.ticks(5),
            x,
            y,
            radius,
            skipped,
            frame: self.frame,
        })
    }
}
