//! Dashboards: named chart sets built from one record set
//!
//! Every chart is built independently. A chart with nothing to draw is
//! reported as [`ChartOutcome::Empty`] and a broken one as
//! [`ChartOutcome::Failed`]; neither stops the remaining charts.

use crate::chart::{
    BarSpec, BoxPlotSpec, BubbleSpec, ChartKind, ChartOutput, DomainSpec, HistogramSpec,
    NumericSource, PieMetric, PieSpec, RankingSpec, ScatterSpec, SunburstSpec, TimelineSpec,
    ViolinSpec,
};
use crate::config::{DashboardConfig, NamedChart};
use crate::error::{ConfigError, ConfigResult};
use crate::filter::RecordFilter;
use imsight_io::{RecordSet, SeriesSpec};
use serde::Serialize;

/// Names accepted by [`Dashboard::preset`]
pub const PRESETS: [&str; 2] = ["finance", "forest"];

/// A validated dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    config: DashboardConfig,
}

/// What building one chart produced
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready { chart: ChartOutput },
    /// No usable records; the view shows an empty state
    Empty { message: String },
    Failed { error: String },
}

impl ChartOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChartOutcome::Ready { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartOutcome::Empty { .. })
    }

    pub fn chart(&self) -> Option<&ChartOutput> {
        match self {
            ChartOutcome::Ready { chart } => Some(chart),
            _ => None,
        }
    }
}

/// Outcome of one named chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartReport {
    pub name: String,
    pub kind: ChartKind,
    #[serde(flatten)]
    pub outcome: ChartOutcome,
}

/// Outcome of a whole dashboard build
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub name: String,
    /// Records handed to the dashboard
    pub records: usize,
    /// Records left after the dashboard filter
    pub filtered: usize,
    pub charts: Vec<ChartReport>,
}

impl DashboardReport {
    /// Look up a chart by name
    pub fn get(&self, name: &str) -> Option<&ChartReport> {
        self.charts.iter().find(|c| c.name == name)
    }

    pub fn ready_count(&self) -> usize {
        self.charts.iter().filter(|c| c.outcome.is_ready()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.charts.iter().filter(|c| c.outcome.is_empty()).count()
    }
}

impl Dashboard {
    /// Create a dashboard from a configuration, validating it first
    pub fn new(config: DashboardConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn charts(&self) -> &[NamedChart] {
        &self.config.charts
    }

    /// Look up a built-in dashboard by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "finance" => Some(Self::finance()),
            "forest" | "forest_cover" | "forest-cover" => Some(Self::forest_cover()),
            _ => None,
        }
    }

    /// Investor survey dashboard
    pub fn finance() -> Self {
        let age = NumericSource::from("age");

        let config = DashboardConfig::new("finance")
            .chart("gender", BarSpec::new("gender").with_palette("gender"))
            .chart("age", HistogramSpec::new(age.clone()).with_bins(20))
            .chart("avenues", PieSpec::new("Avenue").with_palette("category10"))
            .chart(
                "age_vs_amount",
                ScatterSpec::new(age.clone(), NumericSource::from("amount"))
                    .with_domains(DomainSpec::FromZero, DomainSpec::FromZero),
            )
            .chart(
                "age_by_gender",
                ViolinSpec {
                    palette: "gender".into(),
                    ..ViolinSpec::new("gender", age.clone()).with_thresholds(40)
                },
            )
            .chart(
                "duration",
                BubbleSpec::new("Duration", age).with_radius_range(5.0, 30.0),
            )
            .chart(
                "monitoring",
                BarSpec::new("Invest_Monitor").with_palette("monitoring"),
            )
            .chart("goals", SunburstSpec::new("Purpose", "Objective"));

        Self { config }
    }

    /// Country forest cover dashboard over `Forest Area 1990` to `Forest Area 2020`
    pub fn forest_cover() -> Self {
        let series = SeriesSpec::new("Forest Area ", 1990, 2020);
        let forest = NumericSource::latest(series.clone());
        let percent = DomainSpec::Fixed([0.0, 100.0]);

        let config = DashboardConfig::new("forest")
            .chart(
                "top_countries",
                RankingSpec::new("Country Name", forest.clone())
                    .with_top(10)
                    .with_y_domain(percent),
            )
            .chart(
                "continents",
                PieSpec::new("Continent")
                    .with_metric(PieMetric::Mean(forest.clone()))
                    .with_palette("set2"),
            )
            .chart(
                "density_vs_forest",
                ScatterSpec::new(NumericSource::from("Density (per km²)"), forest.clone())
                    .with_domains(DomainSpec::FromZero, percent)
                    .with_label("Country Name"),
            )
            .chart(
                "forest_distribution",
                HistogramSpec::new(forest.clone())
                    .with_bins(20)
                    .with_domain(percent),
            )
            .chart(
                "forest_by_continent",
                BoxPlotSpec::new("Continent", forest).with_y_domain(percent),
            )
            .chart("forest_trend", TimelineSpec::new(series));

        Self { config }
    }

    /// Keep only the named charts, in dashboard order
    pub fn only<S: AsRef<str>>(mut self, names: &[S]) -> ConfigResult<Self> {
        if names.is_empty() {
            return Ok(self);
        }
        for name in names {
            let name = name.as_ref();
            if !self.config.charts.iter().any(|c| c.name == name) {
                return Err(ConfigError::Invalid {
                    chart: name.to_string(),
                    message: format!("no such chart in dashboard '{}'", self.config.name),
                });
            }
        }
        self.config
            .charts
            .retain(|c| names.iter().any(|n| n.as_ref() == c.name));
        Ok(self)
    }

    /// Add predicates to the dashboard filter
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.config.filter = self.config.filter.merge(filter);
        self
    }

    /// Build every chart from the records
    pub fn build(&self, records: &RecordSet) -> DashboardReport {
        let filtered = self.config.filter.apply(records);

        let charts = self
            .config
            .charts
            .iter()
            .map(|named| {
                let outcome = match named.spec.build(&filtered) {
                    Ok(chart) => {
                        tracing::debug!(
                            chart = %named.name,
                            kind = %chart.kind(),
                            skipped = chart.skipped(),
                            "Built chart"
                        );
                        ChartOutcome::Ready { chart }
                    }
                    Err(e) if e.is_no_data() => {
                        tracing::warn!(chart = %named.name, "{}", e);
                        ChartOutcome::Empty {
                            message: e.to_string(),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(chart = %named.name, error = %e, "Chart failed");
                        ChartOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };

                ChartReport {
                    name: named.name.clone(),
                    kind: named.spec.kind(),
                    outcome,
                }
            })
            .collect();

        DashboardReport {
            name: self.config.name.clone(),
            records: records.len(),
            filtered: filtered.len(),
            charts,
        }
    }
}
