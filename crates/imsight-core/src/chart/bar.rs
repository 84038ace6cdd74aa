//! Bar charts of per-category counts or sums

use super::{
    bar_extent, category_of, default_band_padding, resolve_palette, stats_error, validate_frame,
    ChartKind, NumericSource,
};
use crate::error::{validation, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{BandScale, LinearScale, OrdinalScale, Tick};
use imsight_io::RecordSet;
use imsight_stats::{frequency_table, weighted_table, FrequencyTable, WeightedTable};
use serde::{Deserialize, Serialize};

/// What a bar measures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMetric {
    /// Number of records per category
    #[default]
    Count,

    /// Sum of a numeric value per category
    Sum(NumericSource),
}

/// One bar per distinct value of a categorical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSpec {
    pub field: String,
    #[serde(default)]
    pub metric: BarMetric,
    #[serde(default = "default_band_padding")]
    pub padding: f64,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    /// Records that contributed to the bar
    pub count: usize,
    pub value: f64,
    /// Share of the chart total in percent, one decimal place
    pub percentage: Option<f64>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<Color>,
}

/// A built bar chart
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub x: BandScale<String>,
    pub y: LinearScale,
    pub y_ticks: Vec<Tick>,
    pub total: f64,
    pub skipped: usize,
    pub frame: Frame,
}

impl BarSpec {
    /// Count records per value of `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            metric: BarMetric::Count,
            padding: default_band_padding(),
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    /// Sum a numeric value per category instead of counting
    pub fn with_sum(mut self, source: NumericSource) -> Self {
        self.metric = BarMetric::Sum(source);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_palette(mut self, palette: impl Into<PaletteSpec>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.field.as_str()];
        if let BarMetric::Sum(source) = &self.metric {
            fields.extend(source.header_field());
        }
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        validation::validate_padding(self.padding)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<BarChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;
        let key = |r: &&imsight_io::Record| category_of(r, &self.field);

        // (label, count, value, percentage)
        let (rows, total, skipped): (Vec<(String, usize, f64, Option<f64>)>, f64, usize) =
            match &self.metric {
                BarMetric::Count => {
                    let FrequencyTable {
                        entries,
                        total,
                        skipped,
                    } = frequency_table(records, key).map_err(stats_error(ChartKind::Bar))?;
                    let rows = entries
                        .into_iter()
                        .map(|e| (e.key, e.count, e.count as f64, Some(e.percentage)))
                        .collect();
                    (rows, total as f64, skipped)
                }
                BarMetric::Sum(source) => {
                    let WeightedTable {
                        entries,
                        grand_total,
                        skipped,
                    } = weighted_table(records, key, |r| source.value(r))
                        .map_err(stats_error(ChartKind::Bar))?;
                    let rows = entries
                        .into_iter()
                        .map(|e| (e.key, e.count, e.value, e.percentage))
                        .collect();
                    (rows, grand_total, skipped)
                }
            };

        let x = BandScale::new(
            rows.iter().map(|(label, ..)| label.clone()),
            self.frame.x_range(),
            self.padding,
        );
        let max = rows.iter().map(|(_, _, value, _)| *value).fold(0.0, f64::max);
        let y = LinearScale::from_zero(max, self.frame.y_range());
        let color = OrdinalScale::new(x.domain().cloned(), palette.colors);

        let bars = rows
            .into_iter()
            .enumerate()
            .map(|(i, (label, count, value, percentage))| {
                let (top, height) = bar_extent(&y, value);
                Bar {
                    x: x.position(i),
                    y: top,
                    width: x.bandwidth(),
                    height,
                    color: color.map(&label).copied(),
                    label,
                    count,
                    value,
                    percentage,
                }
            })
            .collect();

        tracing::debug!(field = %self.field, skipped, "Built bar chart");
        Ok(BarChart {
            bars,
            y_ticks: y.ticks(5),
            x,
            y,
            total,
            skipped,
            frame: self.frame,
        })
    }
}
