//! Dashboard configuration
//!
//! A dashboard is a named list of chart definitions plus an optional record
//! filter. Configurations load from TOML or JSON:
//!
//! ```toml
//! name = "investors"
//!
//! [[filter.include]]
//! field = "gender"
//! allowed = ["Male"]
//!
//! [[charts]]
//! name = "avenues"
//! kind = "pie"
//! field = "Avenue"
//! ```

use crate::chart::ChartSpec;
use crate::error::{ConfigError, ConfigResult};
use crate::filter::RecordFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A chart definition with the name it is reported under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedChart {
    pub name: String,
    #[serde(flatten)]
    pub spec: ChartSpec,
}

impl NamedChart {
    pub fn new(name: impl Into<String>, spec: impl Into<ChartSpec>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

/// Configuration of a whole dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub name: String,
    /// Applied to the records before any chart is built
    #[serde(default, skip_serializing_if = "RecordFilter::is_empty")]
    pub filter: RecordFilter,
    #[serde(default)]
    pub charts: Vec<NamedChart>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            name: "dashboard".to_string(),
            filter: RecordFilter::default(),
            charts: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a chart
    pub fn chart(mut self, name: impl Into<String>, spec: impl Into<ChartSpec>) -> Self {
        self.charts.push(NamedChart::new(name, spec));
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ConfigResult<Self> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a file; `.json` files are read as JSON,
    /// everything else as TOML
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        tracing::debug!(
            path = %path.display(),
            charts = config.charts.len(),
            "Loaded dashboard configuration"
        );
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for chart in &self.charts {
            if chart.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    chart: self.name.clone(),
                    message: "chart names must not be empty".to_string(),
                });
            }
            if !seen.insert(chart.name.as_str()) {
                return Err(ConfigError::Invalid {
                    chart: chart.name.clone(),
                    message: "duplicate chart name".to_string(),
                });
            }
            chart.spec.validate().map_err(|e| ConfigError::Invalid {
                chart: chart.name.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Names of the configured charts, in order
    pub fn chart_names(&self) -> Vec<&str> {
        self.charts.iter().map(|c| c.name.as_str()).collect()
    }
}
