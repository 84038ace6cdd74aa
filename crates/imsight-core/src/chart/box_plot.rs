//! Box plots of a numeric value per category

use super::{
    category_of, no_data, resolve_palette, validate_domain, validate_frame, ChartKind, DomainSpec,
    NumericSource,
};
use crate::error::{validation, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{BandScale, LinearScale, Tick};
use imsight_io::{Record, RecordSet};
use imsight_stats::{group_by, FiveNumberSummary};
use serde::{Deserialize, Serialize};

fn default_box_padding() -> f64 {
    0.4
}

fn default_box_domain() -> DomainSpec {
    DomainSpec::Extent
}

/// One box per distinct value of a categorical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSpec {
    pub group_field: String,
    pub value: NumericSource,
    #[serde(default = "default_box_padding")]
    pub padding: f64,
    #[serde(default = "default_box_domain")]
    pub y_domain: DomainSpec,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// Pixel geometry of one box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxGeometry {
    /// Left edge of the box
    pub x: f64,
    pub width: f64,
    /// Horizontal center, where the whiskers are drawn
    pub center: f64,
    pub y_min: f64,
    pub y_q1: f64,
    pub y_median: f64,
    pub y_q3: f64,
    pub y_max: f64,
}

/// A category with its summary
///
/// A category whose members carry no numeric value keeps its slot but has
/// no summary and no geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxItem {
    pub label: String,
    /// Numeric observations in the group
    pub count: usize,
    pub summary: Option<FiveNumberSummary>,
    pub geometry: Option<BoxGeometry>,
    /// Observations beyond the 1.5 IQR fences
    pub outliers: Vec<f64>,
    pub color: Option<Color>,
}

/// A built box plot
#[derive(Debug, Clone, Serialize)]
pub struct BoxPlotChart {
    pub boxes: Vec<BoxItem>,
    pub x: BandScale<String>,
    pub y: LinearScale,
    pub y_ticks: Vec<Tick>,
    pub skipped: usize,
    pub frame: Frame,
}

impl BoxPlotSpec {
    pub fn new(group_field: impl Into<String>, value: NumericSource) -> Self {
        Self {
            group_field: group_field.into(),
            value,
            padding: default_box_padding(),
            y_domain: default_box_domain(),
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn with_y_domain(mut self, domain: DomainSpec) -> Self {
        self.y_domain = domain;
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.group_field.as_str()];
        fields.extend(self.value.header_field());
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        validation::validate_padding(self.padding)?;
        validate_domain(&self.y_domain)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<BoxPlotChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let grouping = group_by(records, |r: &&Record| category_of(r, &self.group_field));
        let mut skipped = grouping.skipped();

        let groups: Vec<(String, Vec<f64>)> = grouping
            .into_iter()
            .map(|g| {
                let values: Vec<f64> = g.members.iter().filter_map(|r| self.value.value(r)).collect();
                skipped += g.len() - values.len();
                (g.key, values)
            })
            .collect();

        let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
        if all.is_empty() {
            return Err(no_data(ChartKind::BoxPlot));
        }
        let domain = self
            .y_domain
            .resolve(&all)
            .ok_or_else(|| no_data(ChartKind::BoxPlot))?;

        let x = BandScale::new(
            groups.iter().map(|(label, _)| label.clone()),
            self.frame.x_range(),
            self.padding,
        );
        let y = LinearScale::new(domain, self.frame.y_range());

        let boxes = groups
            .into_iter()
            .enumerate()
            .map(|(i, (label, values))| {
                let summary = FiveNumberSummary::from_data(&values);
                let geometry = summary.map(|s| {
                    let left = x.position(i);
                    BoxGeometry {
                        x: left,
                        width: x.bandwidth(),
                        center: left + x.bandwidth() / 2.0,
                        y_min: y.map(s.min),
                        y_q1: y.map(s.q1),
                        y_median: y.map(s.median),
                        y_q3: y.map(s.q3),
                        y_max: y.map(s.max),
                    }
                });
                let outliers = summary
                    .map(|s| values.iter().copied().filter(|v| s.is_outlier(*v)).collect())
                    .unwrap_or_default();

                BoxItem {
                    label,
                    count: values.len(),
                    summary,
                    geometry,
                    outliers,
                    color: palette.color(i),
                }
            })
            .collect();

        Ok(BoxPlotChart {
            boxes,
            y_ticks: y.ticks(5),
            x,
            y,
            skipped,
            frame: self.frame,
        })
    }
}
