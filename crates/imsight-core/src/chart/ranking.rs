//! Top-N ranking bar charts

use super::{
    bar_extent, category_of, no_data, resolve_palette, validate_domain, validate_frame, ChartKind,
    DomainSpec, NumericSource,
};
use crate::error::{validation, ChartResult};
use crate::frame::{Frame, Margin};
use crate::palette::{Color, PaletteSpec};
use crate::scale::{BandScale, LinearScale, Tick};
use imsight_io::RecordSet;
use imsight_stats::top_n;
use serde::{Deserialize, Serialize};

fn default_top() -> usize {
    10
}

fn default_ranking_padding() -> f64 {
    0.2
}

fn default_ranking_frame() -> Frame {
    Frame::new(460.0, 400.0).with_margin(Margin::new(30.0, 30.0, 70.0, 60.0))
}

fn default_ranking_palette() -> PaletteSpec {
    PaletteSpec::Colors(vec![Color::rgb8(0x69, 0xB3, 0xA2)])
}

/// The `n` records with the largest value, descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSpec {
    /// Field naming each record on the category axis
    pub label_field: String,
    pub value: NumericSource,
    #[serde(default = "default_top")]
    pub n: usize,
    #[serde(default = "default_ranking_padding")]
    pub padding: f64,
    #[serde(default)]
    pub y_domain: DomainSpec,
    #[serde(default = "default_ranking_palette")]
    pub palette: PaletteSpec,
    #[serde(default = "default_ranking_frame")]
    pub frame: Frame,
}

/// A draw-ready ranked bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBar {
    /// 1-based rank
    pub rank: usize,
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<Color>,
}

/// A built ranking chart
#[derive(Debug, Clone, Serialize)]
pub struct RankingChart {
    pub bars: Vec<RankedBar>,
    pub x: BandScale<String>,
    pub y: LinearScale,
    pub y_ticks: Vec<Tick>,
    /// Records with a label and a value that competed for a rank
    pub candidates: usize,
    pub skipped: usize,
    pub frame: Frame,
}

impl RankingSpec {
    pub fn new(label_field: impl Into<String>, value: NumericSource) -> Self {
        Self {
            label_field: label_field.into(),
            value,
            n: default_top(),
            padding: default_ranking_padding(),
            y_domain: DomainSpec::default(),
            palette: default_ranking_palette(),
            frame: default_ranking_frame(),
        }
    }

    pub fn with_top(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_y_domain(mut self, domain: DomainSpec) -> Self {
        self.y_domain = domain;
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.label_field.as_str()];
        fields.extend(self.value.header_field());
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        validation::validate_positive("n", self.n)?;
        validation::validate_padding(self.padding)?;
        validate_domain(&self.y_domain)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<RankingChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let candidates: Vec<(String, f64)> = records
            .iter()
            .filter_map(|r| Some((category_of(r, &self.label_field)?, self.value.value(r)?)))
            .collect();
        let skipped = records.len() - candidates.len();

        let ranked = top_n(&candidates, self.n, |(_, value)| Some(*value));
        if ranked.is_empty() {
            return Err(no_data(ChartKind::Ranking));
        }

        let values: Vec<f64> = ranked.iter().map(|r| r.metric).collect();
        let domain = self
            .y_domain
            .resolve(&values)
            .ok_or_else(|| no_data(ChartKind::Ranking))?;
        let y = LinearScale::new(domain, self.frame.y_range());
        let x = BandScale::new(
            ranked.iter().map(|r| r.item.0.clone()),
            self.frame.x_range(),
            self.padding,
        );

        let bars = ranked
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let (top, height) = bar_extent(&y, r.metric);
                RankedBar {
                    rank: r.rank,
                    label: r.item.0.clone(),
                    value: r.metric,
                    x: x.position(x.index_of(&r.item.0).unwrap_or(i)),
                    y: top,
                    width: x.bandwidth(),
                    height,
                    color: palette.color(i),
                }
            })
            .collect();

        Ok(RankingChart {
            bars,
            y_ticks: y.ticks(5),
            x,
            y,
            candidates: candidates.len(),
            skipped,
            frame: self.frame,
        })
    }
}
