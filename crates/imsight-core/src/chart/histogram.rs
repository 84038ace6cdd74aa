//! Histograms over fixed-width bins

use super::{
    bar_extent, no_data, resolve_palette, validate_domain, validate_frame, ChartKind, DomainSpec,
    NumericSource,
};
use crate::error::{validation, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{LinearScale, Tick};
use imsight_io::RecordSet;
use imsight_stats::{BinSpec, Histogram, SummaryStats};
use serde::{Deserialize, Serialize};

fn default_bins() -> usize {
    20
}

fn default_histogram_domain() -> DomainSpec {
    DomainSpec::Extent
}

/// Counts of a numeric value over equal-width bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSpec {
    pub value: NumericSource,
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default = "default_histogram_domain")]
    pub domain: DomainSpec,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready histogram bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBar {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
    pub px: f64,
    pub py: f64,
    pub width: f64,
    pub height: f64,
}

/// A built histogram
#[derive(Debug, Clone, Serialize)]
pub struct HistogramChart {
    pub bars: Vec<HistogramBar>,
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub color: Option<Color>,
    /// Statistics of every plotted value, including those outside the domain
    pub summary: Option<SummaryStats>,
    /// Values outside the domain
    pub dropped: usize,
    /// Records without a value
    pub skipped: usize,
    pub frame: Frame,
}

impl HistogramSpec {
    pub fn new(value: NumericSource) -> Self {
        Self {
            value,
            bins: default_bins(),
            domain: default_histogram_domain(),
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_domain(mut self, domain: DomainSpec) -> Self {
        self.domain = domain;
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        self.value.header_field().into_iter().collect()
    }

    pub fn validate(&self) -> ChartResult<()> {
        validation::validate_positive("bins", self.bins)?;
        validate_domain(&self.domain)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<HistogramChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let values: Vec<f64> = records.iter().filter_map(|r| self.value.value(r)).collect();
        let skipped = records.len() - values.len();
        let [lo, hi] = self
            .domain
            .resolve(&values)
            .ok_or_else(|| no_data(ChartKind::Histogram))?;

        let spec = BinSpec::new(lo, hi, self.bins)?;
        let histogram = Histogram::counts(spec, &values);
        if histogram.total() == 0 {
            return Err(no_data(ChartKind::Histogram));
        }

        let x = LinearScale::new([lo, hi], self.frame.x_range());
        let y = LinearScale::from_zero(histogram.max_count() as f64, self.frame.y_range());

        let bars = histogram
            .bins()
            .iter()
            .map(|bin| {
                let (py, height) = bar_extent(&y, bin.count() as f64);
                let px = x.map(bin.x0);
                HistogramBar {
                    x0: bin.x0,
                    x1: bin.x1,
                    count: bin.count(),
                    px,
                    py,
                    width: (x.map(bin.x1) - px).max(0.0),
                    height,
                }
            })
            .collect();

        tracing::debug!(
            bins = self.bins,
            dropped = histogram.dropped(),
            skipped,
            "Built histogram"
        );
        Ok(HistogramChart {
            bars,
            x_ticks: x.ticks(5),
            y_ticks: y.ticks(5),
            x,
            y,
            color: palette.color(0),
            summary: SummaryStats::from_data(&values),
            dropped: histogram.dropped(),
            skipped,
            frame: self.frame,
        })
    }
}
