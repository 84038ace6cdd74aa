//! imsight - build chart dashboards from CSV files
//!
//! Loads a CSV file, builds a preset or configured dashboard and prints the
//! draw-ready charts as JSON. Set `RUST_LOG=debug` to see per-chart details.

use clap::{Parser, ValueEnum};
use imsight_core::{
    CategoryPredicate, ChartOutcome, Dashboard, DashboardConfig, DashboardReport, RangePredicate,
    RecordFilter,
};
use imsight_io::{infer_schema, open_file, RecordSet};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imsight")]
#[command(about = "Build draw-ready chart dashboards from CSV data")]
#[command(version)]
struct Cli {
    /// CSV or TSV file to load
    input: PathBuf,

    /// Built-in dashboard
    #[arg(long, value_enum, conflicts_with = "config")]
    preset: Option<Preset>,

    /// Dashboard configuration file (TOML, or JSON by extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build only the named charts (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// Keep records whose FIELD is one of the values (repeatable)
    #[arg(long = "include", value_name = "FIELD=a,b")]
    include: Vec<CategoryPredicate>,

    /// Keep records whose numeric FIELD lies in MIN..MAX (repeatable)
    #[arg(long = "range", value_name = "FIELD=MIN..MAX")]
    range: Vec<RangePredicate>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Finance,
    Forest,
}

impl Preset {
    fn dashboard(self) -> Dashboard {
        match self {
            Preset::Finance => Dashboard::finance(),
            Preset::Forest => Dashboard::forest_cover(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let records = open_file(&cli.input)?;
    let dashboard = load_dashboard(&cli)?
        .only(&cli.only)?
        .with_filter(cli_filter(&cli));

    check_fields(&dashboard, &records);

    let report = dashboard.build(&records);
    summarize(&report);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    match &cli.output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}

fn load_dashboard(cli: &Cli) -> Result<Dashboard, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        let config = DashboardConfig::from_path(path)?;
        return Ok(Dashboard::new(config)?);
    }
    Ok(cli.preset.unwrap_or(Preset::Finance).dashboard())
}

fn cli_filter(cli: &Cli) -> RecordFilter {
    RecordFilter {
        include: cli.include.clone(),
        ranges: cli.range.clone(),
    }
}

/// Warn about chart and filter fields the file does not have
fn check_fields(dashboard: &Dashboard, records: &RecordSet) {
    let schema = infer_schema(records);
    tracing::debug!(
        columns = schema.num_columns(),
        records = records.len(),
        "Inferred schema"
    );

    for chart in dashboard.charts() {
        if let Err(e) = schema.require(chart.spec.fields()) {
            tracing::warn!(chart = %chart.name, "{}", e);
        }
    }
    if let Err(e) = schema.require(dashboard.config().filter.fields()) {
        tracing::warn!("Filter references a missing column: {}", e);
    }
}

fn summarize(report: &DashboardReport) {
    eprintln!(
        "{}: {} of {} records after filtering",
        report.name, report.filtered, report.records
    );
    for chart in &report.charts {
        match &chart.outcome {
            ChartOutcome::Ready { chart: output } => {
                eprintln!("  {:<24} {} ({} skipped)", chart.name, chart.kind, output.skipped())
            }
            ChartOutcome::Empty { message } => eprintln!("  {:<24} {}", chart.name, message),
            ChartOutcome::Failed { error } => eprintln!("  {:<24} error: {}", chart.name, error),
        }
    }
}
