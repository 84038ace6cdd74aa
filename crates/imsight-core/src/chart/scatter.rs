//! Scatter plots of two numeric values per record

use super::{
    category_of, no_data, resolve_palette, validate_domain, validate_frame, ChartKind, DomainSpec,
    NumericSource,
};
use crate::error::{ChartError, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{LinearScale, OrdinalScale, Tick};
use imsight_io::RecordSet;
use serde::{Deserialize, Serialize};

fn default_point_radius() -> f64 {
    5.0
}

/// One point per record with both values present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSpec {
    pub x: NumericSource,
    pub y: NumericSource,
    #[serde(default)]
    pub x_domain: DomainSpec,
    #[serde(default)]
    pub y_domain: DomainSpec,
    /// Field carried along as each point's tooltip label
    #[serde(default)]
    pub label_field: Option<String>,
    /// Categorical field that colors the points
    #[serde(default)]
    pub color_field: Option<String>,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default = "default_point_radius")]
    pub radius: f64,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: Option<String>,
    pub category: Option<String>,
    /// Data coordinates
    pub x: f64,
    pub y: f64,
    /// Plot-area coordinates
    pub px: f64,
    pub py: f64,
    pub color: Option<Color>,
}

/// A built scatter plot
#[derive(Debug, Clone, Serialize)]
pub struct ScatterChart {
    pub points: Vec<Point>,
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub radius: f64,
    pub skipped: usize,
    pub frame: Frame,
}

impl ScatterSpec {
    pub fn new(x: NumericSource, y: NumericSource) -> Self {
        Self {
            x,
            y,
            x_domain: DomainSpec::default(),
            y_domain: DomainSpec::default(),
            label_field: None,
            color_field: None,
            palette: PaletteSpec::default(),
            radius: default_point_radius(),
            frame: Frame::default(),
        }
    }

    pub fn with_domains(mut self, x_domain: DomainSpec, y_domain: DomainSpec) -> Self {
        self.x_domain = x_domain;
        self.y_domain = y_domain;
        self
    }

    pub fn with_label(mut self, field: impl Into<String>) -> Self {
        self.label_field = Some(field.into());
        self
    }

    pub fn with_color(mut self, field: impl Into<String>) -> Self {
        self.color_field = Some(field.into());
        self
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        fields.extend(self.x.header_field());
        fields.extend(self.y.header_field());
        fields.extend(self.label_field.as_deref());
        fields.extend(self.color_field.as_deref());
        fields
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "point radius must be positive, got {}",
                self.radius
            )));
        }
        validate_domain(&self.x_domain)?;
        validate_domain(&self.y_domain)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<ScatterChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let observed: Vec<(f64, f64, Option<String>, Option<String>)> = records
            .iter()
            .filter_map(|r| {
                let x = self.x.value(r)?;
                let y = self.y.value(r)?;
                let label = self.label_field.as_deref().and_then(|f| category_of(r, f));
                let category = self.color_field.as_deref().and_then(|f| category_of(r, f));
                Some((x, y, label, category))
            })
            .collect();
        if observed.is_empty() {
            return Err(no_data(ChartKind::Scatter));
        }
        let skipped = records.len() - observed.len();

        let xs: Vec<f64> = observed.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = observed.iter().map(|p| p.1).collect();
        let x_domain = self
            .x_domain
            .resolve(&xs)
            .ok_or_else(|| no_data(ChartKind::Scatter))?;
        let y_domain = self
            .y_domain
            .resolve(&ys)
            .ok_or_else(|| no_data(ChartKind::Scatter))?;
        let x = LinearScale::new(x_domain, self.frame.x_range());
        let y = LinearScale::new(y_domain, self.frame.y_range());

        let color = self.color_field.as_ref().map(|_| {
            OrdinalScale::new(
                observed.iter().filter_map(|p| p.3.clone()),
                palette.colors.clone(),
            )
        });
        let default_color = palette.color(0);

        let points = observed
            .into_iter()
            .map(|(dx, dy, label, category)| {
                let point_color = match (&color, &category) {
                    (Some(scale), Some(key)) => scale.map(key).copied(),
                    (Some(_), None) => None,
                    (None, _) => default_color,
                };
                Point {
                    label,
                    category,
                    x: dx,
                    y: dy,
                    px: x.map(dx),
                    py: y.map(dy),
                    color: point_color,
                }
            })
            .collect();

        Ok(ScatterChart {
            points,
            x_ticks: x.ticks(5),
            y_ticks: y.ticks(5),
            x,
            y,
            radius: self.radius,
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
    fn test_age_amount_scatter() {
        let chart = ScatterSpec::new(NumericSource::from("age"), NumericSource::from("amount"))
            .with_color("gender")
            .build(&fixtures::investors())
            .unwrap();

        // One record lacks an age, another an amount
        assert_eq!(chart.points.len(), 4);
        assert_eq!(chart.skipped, 2);
        assert_eq!(chart.x.domain(), [0.0, 34.0]);
        assert_eq!(chart.y.domain(), [0.0, 75000.0]);

        let first = &chart.points[0];
        assert_eq!(first.px, chart.frame.inner_width());
        assert_eq!(first.category.as_deref(), Some("Female"));
        assert_ne!(first.color, chart.points[1].color);
    }

    #[test]
    fn test_fixed_domain_and_labels() {
        let chart = ScatterSpec::new(
            NumericSource::from("Density (per km²)"),
            NumericSource::latest(fixtures::forest_series()),
        )
        .with_domains(DomainSpec::FromZero, DomainSpec::Fixed([0.0, 100.0]))
        .with_label("Country Name")
        .build(&fixtures::countries())
        .unwrap();

        assert_eq!(chart.points.len(), 6);
        assert_eq!(chart.points[0].label.as_deref(), Some("Suriname"));
        let inner = chart.frame.inner_height();
        assert!((chart.points[0].py - inner * (1.0 - 0.974)).abs() < 1e-9);
    }

    #[test]
    fn test_no_complete_pairs() {
        let err = ScatterSpec::new(NumericSource::from("gender"), NumericSource::from("age"))
            .build(&fixtures::investors())
            .unwrap_err();
        assert!(err.is_no_data());
    }
}
