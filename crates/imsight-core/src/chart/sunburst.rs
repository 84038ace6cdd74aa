//! Sunburst charts of a two-level category hierarchy

use super::{category_of, no_data, resolve_palette, validate_frame, ChartKind};
use crate::error::{ChartError, ChartResult};
use crate::frame::Frame;
use crate::hierarchy::{partition, Hierarchy};
use crate::palette::{Color, PaletteSpec};
use crate::scale::OrdinalScale;
use imsight_io::RecordSet;
use serde::{Deserialize, Serialize};

/// Records grouped by `levels[0]`, then by `levels[1]`, drawn as rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstSpec {
    pub levels: [String; 2],
    /// Radius of the empty center as a fraction of the outer radius
    #[serde(default)]
    pub inner_radius_ratio: f64,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready ring segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstArc {
    /// Keys from the first level down to this segment; empty for the root
    pub path: Vec<String>,
    pub key: String,
    pub depth: usize,
    pub value: u64,
    pub percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// `None` for the root disc
    pub color: Option<Color>,
}

impl SunburstArc {
    pub fn angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// A built sunburst
#[derive(Debug, Clone, Serialize)]
pub struct SunburstChart {
    /// Every node in pre-order, root first
    pub arcs: Vec<SunburstArc>,
    pub center: [f64; 2],
    pub total: u64,
    /// First-level keys, in legend order
    pub legend: Vec<String>,
    pub skipped: usize,
    pub frame: Frame,
}

impl SunburstSpec {
    pub fn new(level1: impl Into<String>, level2: impl Into<String>) -> Self {
        Self {
            levels: [level1.into(), level2.into()],
            inner_radius_ratio: 0.0,
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.levels.iter().map(String::as_str).collect()
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

    pub fn build(&self, records: &RecordSet) -> ChartResult<SunburstChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;
        let [level1, level2] = &self.levels;

        let hierarchy = Hierarchy::two_level(
            records.records(),
            |r| category_of(r, level1),
            |r| category_of(r, level2),
        );
        if hierarchy.is_empty() {
            return Err(no_data(ChartKind::Sunburst));
        }
        debug_assert!(hierarchy.root.check_sums());

        let outer_radius = self.frame.radius();
        let layout = partition(
            &hierarchy.root,
            outer_radius * self.inner_radius_ratio,
            outer_radius,
        );

        // Keys share one color domain across both levels, first seen first
        let color = OrdinalScale::new(
            layout
                .iter()
                .filter(|arc| arc.depth > 0)
                .map(|arc| arc.key.clone()),
            palette.colors,
        );
        let legend = hierarchy
            .root
            .children
            .iter()
            .map(|c| c.key.clone())
            .collect();

        let arcs = layout
            .into_iter()
            .map(|arc| SunburstArc {
                color: if arc.depth == 0 {
                    None
                } else {
                    color.map(&arc.key).copied()
                },
                path: arc.path,
                key: arc.key,
                depth: arc.depth,
                value: arc.value,
                percentage: arc.percentage,
                start_angle: arc.start_angle,
                end_angle: arc.end_angle,
                inner_radius: arc.inner_radius,
                outer_radius: arc.outer_radius,
            })
            .collect();

        Ok(SunburstChart {
            arcs,
            center: self.frame.center(),
            total: hierarchy.total(),
            legend,
            skipped: hierarchy.skipped,
            frame: self.frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures;
    use std::f64::consts::TAU;

    #[test]
    fn test_purpose_objective_sunburst() {
        let chart = SunburstSpec::new("Purpose", "Objective")
            .build(&fixtures::investors())
            .unwrap();

        assert_eq!(chart.total, 6);
        assert_eq!(
            chart.legend,
            vec!["Wealth Creation", "Savings for Future", "Returns"]
        );

        let root = &chart.arcs[0];
        assert_eq!(root.depth, 0);
        assert!(root.color.is_none());
        assert_eq!(root.end_angle, TAU);

        let wealth = &chart.arcs[1];
        assert_eq!(wealth.key, "Wealth Creation");
        assert_eq!(wealth.value, 3);
        assert_eq!(wealth.percentage, 50.0);
        assert!((wealth.angle() - TAU / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_children_nest_inside_parent() {
        let chart = SunburstSpec::new("Purpose", "Objective")
            .build(&fixtures::investors())
            .unwrap();

        for parent in chart.arcs.iter().filter(|a| a.depth == 1) {
            let children: Vec<&SunburstArc> = chart
                .arcs
                .iter()
                .filter(|a| a.depth == 2 && a.path[0] == parent.key)
                .collect();
            let sum: u64 = children.iter().map(|c| c.value).sum();
            assert_eq!(sum, parent.value);
            assert_eq!(children[0].start_angle, parent.start_angle);
            assert_eq!(children.last().unwrap().end_angle, parent.end_angle);
            assert_eq!(children[0].inner_radius, parent.outer_radius);
        }
    }

    #[test]
    fn test_shared_key_shares_color() {
        let chart = SunburstSpec::new("Purpose", "Objective")
            .build(&fixtures::investors())
            .unwrap();

        let growth: Vec<Option<Color>> = chart
            .arcs
            .iter()
            .filter(|a| a.key == "Growth")
            .map(|a| a.color)
            .collect();
        assert_eq!(growth.len(), 2);
        assert_eq!(growth[0], growth[1]);
        assert!(growth[0].is_some());
        assert!(chart.arcs.iter().filter(|a| a.depth > 0).all(|a| a.color.is_some()));
    }

    #[test]
    fn test_empty_is_no_data() {
        let err = SunburstSpec::new("Purpose", "Objective")
            .build(&RecordSet::default())
            .unwrap_err();
        assert!(err.is_no_data());
    }
}
