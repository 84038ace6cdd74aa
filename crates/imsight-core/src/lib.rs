//! imsight-core - Chart pipeline for tabular data
//!
//! This crate turns an immutable [`imsight_io::RecordSet`] into draw-ready
//! chart series: every mark already positioned in plot-area pixels, with the
//! scales, colors and labels a view layer needs.
//!
//! # Key Components
//!
//! - **Scale**: linear, square-root, band and ordinal mappings from data to
//!   pixels or colors
//! - **Hierarchy**: two-level category trees and their radial partition
//! - **Chart**: builders for bar, ranking, pie, scatter, histogram, box plot,
//!   violin, bubble, sunburst and timeline charts
//! - **Filter**: category and range predicates applied before aggregation
//! - **Dashboard**: named chart sets loaded from TOML or JSON, with built-in
//!   finance and forest-cover presets
//!
//! # Empty data
//!
//! A chart with nothing to draw is not a failure: builders return
//! [`ChartError::NoData`] and dashboards report it as
//! [`ChartOutcome::Empty`], leaving the other charts untouched.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod frame;
pub mod hierarchy;
pub mod palette;
pub mod scale;

pub use chart::{ChartKind, ChartOutput, ChartSpec, DomainSpec, NumericSource};
pub use config::{DashboardConfig, NamedChart};
pub use dashboard::{ChartOutcome, ChartReport, Dashboard, DashboardReport, PRESETS};
pub use error::*;
pub use filter::{CategoryPredicate, RangePredicate, RecordFilter};
pub use frame::{Frame, Margin};
pub use hierarchy::{partition, Hierarchy, HierarchyNode, PartitionArc};
pub use palette::{get_palette, Color, Palette, PaletteSpec};
pub use scale::{BandScale, LinearScale, OrdinalScale, SqrtScale, Tick};
