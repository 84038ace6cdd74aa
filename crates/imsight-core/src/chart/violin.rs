//! Violin plots: mirrored per-category histograms

use super::{
    category_of, default_band_padding, no_data, resolve_palette, stats_error, validate_frame,
    ChartKind, NumericSource,
};
use crate::error::{validation, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{BandScale, LinearScale, Tick};
use imsight_io::RecordSet;
use imsight_stats::{group_by, BinSpec, Histogram};
use serde::{Deserialize, Serialize};

fn default_thresholds() -> usize {
    40
}

/// Distribution of a numeric value per category
///
/// Every category is binned over the same domain, the extent of all values,
/// so the violins share one vertical axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinSpec {
    pub group_field: String,
    pub value: NumericSource,
    #[serde(default = "default_thresholds")]
    pub thresholds: usize,
    #[serde(default = "default_band_padding")]
    pub padding: f64,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// One bin of a violin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinBin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
    /// Vertical pixel position of the bin center
    pub y: f64,
    /// Distance from the violin center to its outline at this bin
    pub half_width: f64,
}

/// One violin
#[derive(Debug, Clone, Serialize)]
pub struct Violin {
    pub label: String,
    /// Observations in the category
    pub count: usize,
    /// Horizontal pixel position of the axis of symmetry
    pub center: f64,
    pub bins: Vec<ViolinBin>,
    /// Maps bin counts onto half-widths
    pub width: LinearScale,
    pub color: Option<Color>,
}

/// A built violin plot
#[derive(Debug, Clone, Serialize)]
pub struct ViolinChart {
    pub violins: Vec<Violin>,
    pub x: BandScale<String>,
    pub y: LinearScale,
    pub y_ticks: Vec<Tick>,
    pub skipped: usize,
    pub frame: Frame,
}

impl ViolinSpec {
    pub fn new(group_field: impl Into<String>, value: NumericSource) -> Self {
        Self {
            group_field: group_field.into(),
            value,
            thresholds: default_thresholds(),
            padding: default_band_padding(),
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: usize) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.group_field.as_str()];
        fields.extend(self.value.header_field());
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        validation::validate_positive("thresholds", self.thresholds)?;
        validation::validate_padding(self.padding)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<ViolinChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let observations: Vec<(String, f64)> = records
            .iter()
            .filter_map(|r| Some((category_of(r, &self.group_field)?, self.value.value(r)?)))
            .collect();
        let skipped = records.len() - observations.len();

        let all: Vec<f64> = observations.iter().map(|(_, v)| *v).collect();
        let spec = BinSpec::from_extent(&all, self.thresholds)
            .map_err(stats_error(ChartKind::Violin))?;

        let groups = group_by(observations, |(label, _)| Some(label.clone()));
        if groups.is_empty() {
            return Err(no_data(ChartKind::Violin));
        }

        let x = BandScale::new(groups.keys().cloned(), self.frame.x_range(), self.padding);
        let y = LinearScale::new([spec.lo(), spec.hi()], self.frame.y_range());
        let half_band = x.bandwidth() / 2.0;

        let violins = groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let values: Vec<f64> = group.members.iter().map(|(_, v)| *v).collect();
                let histogram = Histogram::counts(spec, &values);
                let width = LinearScale::from_zero(histogram.max_count() as f64, [0.0, half_band]);

                let bins = histogram
                    .bins()
                    .iter()
                    .map(|bin| ViolinBin {
                        x0: bin.x0,
                        x1: bin.x1,
                        count: bin.count(),
                        y: y.map(bin.center()),
                        half_width: width.map(bin.count() as f64),
                    })
                    .collect();

                Violin {
                    count: values.len(),
                    center: x.position(i) + half_band,
                    label: group.key,
                    bins,
                    width,
                    color: palette.color(i),
                }
            })
            .collect();

        Ok(ViolinChart {
            violins,
            y_ticks: y.ticks(5),
            x,
            y,
            skipped,
            frame: self.frame,
        })
    }
}
