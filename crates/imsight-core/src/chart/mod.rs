//! Chart builders
//!
//! Each builder takes the immutable record set, aggregates it and returns a
//! draw-ready series: scales, mark geometry in plot-area pixels, colors and
//! labels. Builders are pure; building twice from the same records yields
//! the same chart.
//!
//! Records that lack a referenced field, or whose numeric field does not
//! parse, are left out and counted in each chart's `skipped`. When nothing
//! remains to draw, builders return [`ChartError::NoData`].

pub mod bar;
pub mod box_plot;
pub mod bubble;
pub mod histogram;
pub mod pie;
pub mod ranking;
pub mod scatter;
pub mod source;
pub mod sunburst;
pub mod timeline;
pub mod violin;

pub use bar::{Bar, BarChart, BarMetric, BarSpec};
pub use box_plot::{BoxGeometry, BoxItem, BoxPlotChart, BoxPlotSpec};
pub use bubble::{Bubble, BubbleChart, BubbleSpec};
pub use histogram::{HistogramBar, HistogramChart, HistogramSpec};
pub use pie::{PieChart, PieMetric, PieSpec, Slice};
pub use ranking::{RankedBar, RankingChart, RankingSpec};
pub use scatter::{Point, ScatterChart, ScatterSpec};
pub use source::{extent, DomainSpec, NumericSource};
pub use sunburst::{SunburstArc, SunburstChart, SunburstSpec};
pub use timeline::{TimelineAggregate, TimelineChart, TimelinePoint, TimelineSpec};
pub use violin::{Violin, ViolinBin, ViolinChart, ViolinSpec};

use crate::error::{validation, ChartError, ChartResult};
use crate::frame::Frame;
use crate::palette::{Palette, PaletteSpec};
use imsight_io::{Record, RecordSet};
use imsight_stats::StatsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of chart the pipeline can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Ranking,
    Pie,
    Scatter,
    Histogram,
    BoxPlot,
    Violin,
    Bubble,
    Sunburst,
    Timeline,
}

impl ChartKind {
    /// Every chart kind
    pub fn all() -> [ChartKind; 10] {
        [
            ChartKind::Bar,
            ChartKind::Ranking,
            ChartKind::Pie,
            ChartKind::Scatter,
            ChartKind::Histogram,
            ChartKind::BoxPlot,
            ChartKind::Violin,
            ChartKind::Bubble,
            ChartKind::Sunburst,
            ChartKind::Timeline,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Ranking => "ranking",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Histogram => "histogram",
            ChartKind::BoxPlot => "box plot",
            ChartKind::Violin => "violin",
            ChartKind::Bubble => "bubble",
            ChartKind::Sunburst => "sunburst",
            ChartKind::Timeline => "timeline",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Definition of one chart, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarSpec),
    Ranking(RankingSpec),
    Pie(PieSpec),
    Scatter(ScatterSpec),
    Histogram(HistogramSpec),
    BoxPlot(BoxPlotSpec),
    Violin(ViolinSpec),
    Bubble(BubbleSpec),
    Sunburst(SunburstSpec),
    Timeline(TimelineSpec),
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::Bar(_) => ChartKind::Bar,
            ChartSpec::Ranking(_) => ChartKind::Ranking,
            ChartSpec::Pie(_) => ChartKind::Pie,
            ChartSpec::Scatter(_) => ChartKind::Scatter,
            ChartSpec::Histogram(_) => ChartKind::Histogram,
            ChartSpec::BoxPlot(_) => ChartKind::BoxPlot,
            ChartSpec::Violin(_) => ChartKind::Violin,
            ChartSpec::Bubble(_) => ChartKind::Bubble,
            ChartSpec::Sunburst(_) => ChartKind::Sunburst,
            ChartSpec::Timeline(_) => ChartKind::Timeline,
        }
    }

    /// Header columns the chart reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ChartSpec::Bar(spec) => spec.fields(),
            ChartSpec::Ranking(spec) => spec.fields(),
            ChartSpec::Pie(spec) => spec.fields(),
            ChartSpec::Scatter(spec) => spec.fields(),
            ChartSpec::Histogram(spec) => spec.fields(),
            ChartSpec::BoxPlot(spec) => spec.fields(),
            ChartSpec::Violin(spec) => spec.fields(),
            ChartSpec::Bubble(spec) => spec.fields(),
            ChartSpec::Sunburst(spec) => spec.fields(),
            ChartSpec::Timeline(_) => Vec::new(),
        }
    }

    /// Check the chart parameters without looking at any data
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            ChartSpec::Bar(spec) => spec.validate(),
            ChartSpec::Ranking(spec) => spec.validate(),
            ChartSpec::Pie(spec) => spec.validate(),
            ChartSpec::Scatter(spec) => spec.validate(),
            ChartSpec::Histogram(spec) => spec.validate(),
            ChartSpec::BoxPlot(spec) => spec.validate(),
            ChartSpec::Violin(spec) => spec.validate(),
            ChartSpec::Bubble(spec) => spec.validate(),
            ChartSpec::Sunburst(spec) => spec.validate(),
            ChartSpec::Timeline(spec) => spec.validate(),
        }
    }

    /// Build the chart from a record set
    pub fn build(&self, records: &RecordSet) -> ChartResult<ChartOutput> {
        if !records.header().is_empty() {
            for field in self.fields() {
                validation::validate_field_exists(field, records.header())?;
            }
        }

        Ok(match self {
            ChartSpec::Bar(spec) => ChartOutput::Bar(spec.build(records)?),
            ChartSpec::Ranking(spec) => ChartOutput::Ranking(spec.build(records)?),
            ChartSpec::Pie(spec) => ChartOutput::Pie(spec.build(records)?),
            ChartSpec::Scatter(spec) => ChartOutput::Scatter(spec.build(records)?),
            ChartSpec::Histogram(spec) => ChartOutput::Histogram(spec.build(records)?),
            ChartSpec::BoxPlot(spec) => ChartOutput::BoxPlot(spec.build(records)?),
            ChartSpec::Violin(spec) => ChartOutput::Violin(spec.build(records)?),
            ChartSpec::Bubble(spec) => ChartOutput::Bubble(spec.build(records)?),
            ChartSpec::Sunburst(spec) => ChartOutput::Sunburst(spec.build(records)?),
            ChartSpec::Timeline(spec) => ChartOutput::Timeline(spec.build(records)?),
        })
    }
}

impl From<BarSpec> for ChartSpec {
    fn from(spec: BarSpec) -> Self {
        ChartSpec::Bar(spec)
    }
}

impl From<RankingSpec> for ChartSpec {
    fn from(spec: RankingSpec) -> Self {
        ChartSpec::Ranking(spec)
    }
}

impl From<PieSpec> for ChartSpec {
    fn from(spec: PieSpec) -> Self {
        ChartSpec::Pie(spec)
    }
}

impl From<ScatterSpec> for ChartSpec {
    fn from(spec: ScatterSpec) -> Self {
        ChartSpec::Scatter(spec)
    }
}

impl From<HistogramSpec> for ChartSpec {
    fn from(spec: HistogramSpec) -> Self {
        ChartSpec::Histogram(spec)
    }
}

impl From<BoxPlotSpec> for ChartSpec {
    fn from(spec: BoxPlotSpec) -> Self {
        ChartSpec::BoxPlot(spec)
    }
}

impl From<ViolinSpec> for ChartSpec {
    fn from(spec: ViolinSpec) -> Self {
        ChartSpec::Violin(spec)
    }
}

impl From<BubbleSpec> for ChartSpec {
    fn from(spec: BubbleSpec) -> Self {
        ChartSpec::Bubble(spec)
    }
}

impl From<SunburstSpec> for ChartSpec {
    fn from(spec: SunburstSpec) -> Self {
        ChartSpec::Sunburst(spec)
    }
}

impl From<TimelineSpec> for ChartSpec {
    fn from(spec: TimelineSpec) -> Self {
        ChartSpec::Timeline(spec)
    }
}

/// A built chart, tagged by `kind`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartOutput {
    Bar(BarChart),
    Ranking(RankingChart),
    Pie(PieChart),
    Scatter(ScatterChart),
    Histogram(HistogramChart),
    BoxPlot(BoxPlotChart),
    Violin(ViolinChart),
    Bubble(BubbleChart),
    Sunburst(SunburstChart),
    Timeline(TimelineChart),
}

impl ChartOutput {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartOutput::Bar(_) => ChartKind::Bar,
            ChartOutput::Ranking(_) => ChartKind::Ranking,
            ChartOutput::Pie(_) => ChartKind::Pie,
            ChartOutput::Scatter(_) => ChartKind::Scatter,
            ChartOutput::Histogram(_) => ChartKind::Histogram,
            ChartOutput::BoxPlot(_) => ChartKind::BoxPlot,
            ChartOutput::Violin(_) => ChartKind::Violin,
            ChartOutput::Bubble(_) => ChartKind::Bubble,
            ChartOutput::Sunburst(_) => ChartKind::Sunburst,
            ChartOutput::Timeline(_) => ChartKind::Timeline,
        }
    }

    /// Records left out of the chart
    pub fn skipped(&self) -> usize {
        match self {
            ChartOutput::Bar(c) => c.skipped,
            ChartOutput::Ranking(c) => c.skipped,
            ChartOutput::Pie(c) => c.skipped,
            ChartOutput::Scatter(c) => c.skipped,
            ChartOutput::Histogram(c) => c.skipped,
            ChartOutput::BoxPlot(c) => c.skipped,
            ChartOutput::Violin(c) => c.skipped,
            ChartOutput::Bubble(c) => c.skipped,
            ChartOutput::Sunburst(c) => c.skipped,
            ChartOutput::Timeline(c) => c.skipped,
        }
    }
}

// MARK: - Shared helpers

pub(crate) fn default_band_padding() -> f64 {
    0.1
}

/// Map an aggregation failure to a chart error; an empty aggregation is the
/// empty-state signal
pub(crate) fn stats_error(kind: ChartKind) -> impl Fn(StatsError) -> ChartError {
    move |err| match err {
        StatsError::EmptyDataset => ChartError::NoData { chart: kind },
        other => ChartError::Stats(other),
    }
}

pub(crate) fn no_data(kind: ChartKind) -> ChartError {
    ChartError::NoData { chart: kind }
}

/// Categorical value of a field, `None` when the field is missing
pub(crate) fn category_of(record: &Record, field: &str) -> Option<String> {
    record.category(field).ok().map(|value| value.into_owned())
}

pub(crate) fn resolve_palette(spec: &PaletteSpec) -> ChartResult<Palette> {
    spec.resolve().ok_or_else(|| match spec {
        PaletteSpec::Named(name) => ChartError::InvalidConfig(format!("unknown palette '{}'", name)),
        PaletteSpec::Colors(_) => ChartError::InvalidConfig("invalid palette".to_string()),
    })
}

pub(crate) fn validate_frame(frame: &Frame) -> ChartResult<()> {
    if !frame.is_valid() {
        return Err(ChartError::InvalidConfig(format!(
            "margins leave no plot area in a {}x{} frame",
            frame.width, frame.height
        )));
    }
    Ok(())
}

pub(crate) fn validate_domain(domain: &DomainSpec) -> ChartResult<()> {
    if let DomainSpec::Fixed([lo, hi]) = domain {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(ChartError::InvalidConfig(format!(
                "domain [{}, {}] is not finite",
                lo, hi
            )));
        }
    }
    Ok(())
}

/// Top and height of a bar rising from the zero baseline of `y`
pub(crate) fn bar_extent(y: &crate::scale::LinearScale, value: f64) -> (f64, f64) {
    let base = y.map(0.0);
    let top = y.map(value);
    (top.min(base), (base - top).abs())
}
