//! Dashboard integration tests over the CSV fixtures

mod common;

use common::fixtures;
use imsight_core::chart::{BarSpec, PieMetric, PieSpec};
use imsight_core::{
    ChartKind, ChartOutcome, ChartOutput, Dashboard, DashboardConfig, NumericSource, RecordFilter,
};
use imsight_io::{infer_schema, CsvReader, RecordSet};

fn ready<'a>(report: &'a imsight_core::DashboardReport, name: &str) -> &'a ChartOutput {
    report
        .get(name)
        .and_then(|c| c.outcome.chart())
        .unwrap_or_else(|| panic!("chart '{}' not built", name))
}

// === Finance ===

#[test]
fn test_finance_dashboard_builds_every_chart() {
    let report = Dashboard::finance().build(&fixtures::finance());

    assert_eq!(report.records, 10);
    assert_eq!(report.charts.len(), 8);
    assert_eq!(report.ready_count(), 8);
}

#[test]
fn test_gender_split_is_even() {
    let report = Dashboard::finance().build(&fixtures::finance());

    let ChartOutput::Bar(chart) = ready(&report, "gender") else {
        panic!("gender is not a bar chart");
    };
    let percentages: Vec<Option<f64>> = chart.bars.iter().map(|b| b.percentage).collect();
    assert_eq!(percentages, vec![Some(50.0), Some(50.0)]);
    assert_eq!(chart.bars[0].color.unwrap().to_hex(), "#FF69B4");
}

#[test]
fn test_scatter_skips_unparseable_amounts() {
    let report = Dashboard::finance().build(&fixtures::finance());

    let ChartOutput::Scatter(chart) = ready(&report, "age_vs_amount") else {
        panic!("age_vs_amount is not a scatter plot");
    };
    assert_eq!(chart.points.len(), 8);
    assert_eq!(chart.skipped, 2);
    assert_eq!(chart.x.domain(), [0.0, 35.0]);
}

#[test]
fn test_sunburst_totals_every_record() {
    let report = Dashboard::finance().build(&fixtures::finance());

    let ChartOutput::Sunburst(chart) = ready(&report, "goals") else {
        panic!("goals is not a sunburst");
    };
    assert_eq!(chart.total, 10);
    assert_eq!(
        chart.legend,
        vec!["Wealth Creation", "Savings for Future", "Returns"]
    );
}

#[test]
fn test_range_filter_narrows_records() {
    let report = Dashboard::finance()
        .with_filter(RecordFilter::new().range("age", Some(30.0), None))
        .build(&fixtures::finance());

    assert_eq!(report.filtered, 4);
    let ChartOutput::Histogram(chart) = ready(&report, "age") else {
        panic!("age is not a histogram");
    };
    assert_eq!(chart.x.domain(), [30.0, 35.0]);
}

// === Forest cover ===

#[test]
fn test_forest_dashboard_builds_every_chart() {
    let report = Dashboard::forest_cover().build(&fixtures::forest());
    assert_eq!(report.ready_count(), 6);
}

#[test]
fn test_top_countries_by_latest_forest_area() {
    let report = Dashboard::forest_cover().build(&fixtures::forest());

    let ChartOutput::Ranking(chart) = ready(&report, "top_countries") else {
        panic!("top_countries is not a ranking");
    };
    let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        &labels[..4],
        &["Suriname", "Finland", "Japan", "Brazil"]
    );
    // Atlantis has no value in any year
    assert_eq!(chart.candidates, 9);
    assert_eq!(chart.y.domain(), [0.0, 100.0]);
}

#[test]
fn test_latest_value_falls_back_to_earlier_year() {
    let report = Dashboard::forest_cover().build(&fixtures::forest());

    let ChartOutput::Ranking(chart) = ready(&report, "top_countries") else {
        panic!("top_countries is not a ranking");
    };
    let kenya = chart.bars.iter().find(|b| b.label == "Kenya").unwrap();
    assert_eq!(kenya.value, 6.3);
}

#[test]
fn test_timeline_covers_every_year() {
    let report = Dashboard::forest_cover().build(&fixtures::forest());

    let ChartOutput::Timeline(chart) = ready(&report, "forest_trend") else {
        panic!("forest_trend is not a timeline");
    };
    assert_eq!(chart.points.len(), 31);
    assert_eq!(chart.points[0].year, 1990);
    assert_eq!(chart.points[0].count, 9);
    assert_eq!(chart.points[30].count, 8);
    assert_eq!(chart.skipped, 1);
}

#[test]
fn test_continent_pie_reports_undefined_mean() {
    let config = DashboardConfig::new("continents").chart(
        "continents",
        PieSpec::new("Continent")
            .with_metric(PieMetric::Mean(NumericSource::field("Forest Area 2020"))),
    );
    let report = Dashboard::new(config).unwrap().build(&fixtures::forest());

    let ChartOutput::Pie(chart) = ready(&report, "continents") else {
        panic!("continents is not a pie");
    };
    // Atlantis has an empty continent and no forest area
    assert_eq!(chart.undefined, vec![String::new()]);
}

// === Empty and broken inputs ===

#[test]
fn test_empty_record_set_reports_every_chart_empty() {
    for dashboard in [Dashboard::finance(), Dashboard::forest_cover()] {
        let report = dashboard.build(&RecordSet::default());
        assert_eq!(report.empty_count(), report.charts.len());
        for chart in &report.charts {
            assert!(matches!(chart.outcome, ChartOutcome::Empty { .. }));
        }
    }
}

#[test]
fn test_filter_removing_everything_reports_empty() {
    let report = Dashboard::finance()
        .with_filter(RecordFilter::new().include("gender", ["Other"]))
        .build(&fixtures::finance());

    assert_eq!(report.filtered, 0);
    assert_eq!(report.ready_count(), 0);
}

#[test]
fn test_short_row_counts_as_empty_category() {
    let records = CsvReader::new()
        .read_from("age,gender\n30,Male\n40\n".as_bytes())
        .unwrap();
    let chart = BarSpec::new("gender").build(&records).unwrap();

    let bars: Vec<(&str, Option<f64>)> = chart
        .bars
        .iter()
        .map(|b| (b.label.as_str(), b.percentage))
        .collect();
    assert_eq!(bars, vec![("Male", Some(50.0)), ("", Some(50.0))]);
    assert_eq!(chart.skipped, 0);
}

#[test]
fn test_preset_on_wrong_dataset_fails_per_chart() {
    let report = Dashboard::finance().build(&fixtures::forest());

    assert_eq!(report.ready_count(), 0);
    let gender = report.get("gender").unwrap();
    assert_eq!(gender.kind, ChartKind::Bar);
    match &gender.outcome {
        ChartOutcome::Failed { error } => assert!(error.contains("gender")),
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[test]
fn test_chart_fields_exist_in_schema() {
    let records = fixtures::finance();
    let schema = infer_schema(&records);

    for chart in Dashboard::finance().charts() {
        assert!(schema.require(chart.spec.fields()).is_ok(), "{}", chart.name);
    }
    assert!(schema.require(BarSpec::new("Country Name").fields()).is_err());
}
