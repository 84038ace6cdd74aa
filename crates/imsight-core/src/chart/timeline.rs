//! Timelines of a year-indexed value aggregated across records

use super::{no_data, resolve_palette, validate_domain, validate_frame, ChartKind, DomainSpec};
use crate::error::{ChartError, ChartResult};
use crate::frame::Frame;
use crate::palette::{Color, PaletteSpec};
use crate::scale::{LinearScale, Tick};
use imsight_io::{RecordSet, SeriesPoint, SeriesSpec};
use imsight_stats::{BinSpec, Histogram};
use serde::{Deserialize, Serialize};

/// How the values of one year are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineAggregate {
    #[default]
    Mean,
    Sum,
    Count,
}

/// One point per year of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSpec {
    pub series: SeriesSpec,
    #[serde(default)]
    pub aggregate: TimelineAggregate,
    #[serde(default)]
    pub y_domain: DomainSpec,
    #[serde(default)]
    pub palette: PaletteSpec,
    #[serde(default)]
    pub frame: Frame,
}

/// A draw-ready timeline point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub year: i32,
    /// Records with a value for the year
    pub count: usize,
    /// Aggregated value; `None` when no record has a value for the year
    pub value: Option<f64>,
    pub px: f64,
    pub py: Option<f64>,
}

/// A built timeline
#[derive(Debug, Clone, Serialize)]
pub struct TimelineChart {
    pub points: Vec<TimelinePoint>,
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub color: Option<Color>,
    /// Records with no value in any year
    pub skipped: usize,
    pub frame: Frame,
}

impl TimelineSpec {
    pub fn new(series: SeriesSpec) -> Self {
        Self {
            series,
            aggregate: TimelineAggregate::default(),
            y_domain: DomainSpec::default(),
            palette: PaletteSpec::default(),
            frame: Frame::default(),
        }
    }

    pub fn with_aggregate(mut self, aggregate: TimelineAggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.series.is_empty() {
            return Err(ChartError::InvalidConfig(format!(
                "series '{}' covers no year",
                self.series.prefix
            )));
        }
        validate_domain(&self.y_domain)?;
        validate_frame(&self.frame)?;
        resolve_palette(&self.palette).map(|_| ())
    }

    pub fn build(&self, records: &RecordSet) -> ChartResult<TimelineChart> {
        self.validate()?;
        let palette = resolve_palette(&self.palette)?;

        let mut skipped = 0;
        let mut points: Vec<SeriesPoint> = Vec::new();
        for record in records {
            let series = record.series(&self.series);
            if series.is_empty() {
                skipped += 1;
            }
            points.extend(series);
        }

        // One unit-wide bin per year
        let first = self.series.first_year;
        let bins = BinSpec::new(
            first as f64,
            (self.series.last_year + 1) as f64,
            self.series.len(),
        )?;
        let by_year = Histogram::build(bins, points, |p| Some(p.year as f64));

        let yearly: Vec<(i32, usize, Option<f64>)> = by_year
            .bins()
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                let value = match self.aggregate {
                    TimelineAggregate::Mean => bin.mean_by(|p| p.value),
                    TimelineAggregate::Sum => bin.sum_by(|p| p.value),
                    TimelineAggregate::Count => Some(bin.count() as f64),
                };
                (first + i as i32, bin.count(), value)
            })
            .collect();

        let values: Vec<f64> = yearly.iter().filter_map(|(_, _, v)| *v).collect();
        if by_year.total() == 0 {
            return Err(no_data(ChartKind::Timeline));
        }
        let domain = self
            .y_domain
            .resolve(&values)
            .ok_or_else(|| no_data(ChartKind::Timeline))?;

        let x = LinearScale::new(
            [first as f64, self.series.last_year as f64],
            self.frame.x_range(),
        );
        let y = LinearScale::new(domain, self.frame.y_range());

        let points = yearly
            .into_iter()
            .map(|(year, count, value)| TimelinePoint {
                year,
                count,
                value,
                px: x.map(year as f64),
                py: value.map(|v| y.map(v)),
            })
            .collect();

        Ok(TimelineChart {
            points,
            x_ticks: x.ticks(5),
            y_ticks: y.ticks(5),
            x,
            y,
            color: palette.color(0),
            skipped,
            frame: self.frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures;
    use imsight_io::Record;

    #[test]
    fn test_mean_per_year() {
        let chart = TimelineSpec::new(fixtures::forest_series())
            .build(&fixtures::countries())
            .unwrap();

        let years: Vec<i32> = chart.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);

        // 2002 lacks Brazil and Iceland
        assert_eq!(chart.points[0].count, 6);
        assert_eq!(chart.points[2].count, 4);
        let expected = (97.4 + 73.7 + 68.4 + 0.0) / 4.0;
        assert!((chart.points[2].value.unwrap() - expected).abs() < 1e-9);
        assert_eq!(chart.skipped, 1);

        assert_eq!(chart.points[0].px, 0.0);
        assert_eq!(chart.points[2].px, chart.frame.inner_width());
    }

    #[test]
    fn test_sum_and_count() {
        let records = RecordSet::from_records(vec![
            Record::new().with("v2000", "1").with("v2001", "2"),
            Record::new().with("v2000", "3"),
        ]);
        let series = SeriesSpec::new("v", 2000, 2001);

        let sums = TimelineSpec::new(series.clone())
            .with_aggregate(TimelineAggregate::Sum)
            .build(&records)
            .unwrap();
        assert_eq!(sums.points[0].value, Some(4.0));
        assert_eq!(sums.points[1].value, Some(2.0));

        let counts = TimelineSpec::new(series)
            .with_aggregate(TimelineAggregate::Count)
            .build(&records)
            .unwrap();
        assert_eq!(counts.points[0].value, Some(2.0));
        assert_eq!(counts.points[1].value, Some(1.0));
    }

    #[test]
    fn test_year_without_values_has_no_position() {
        let records = RecordSet::from_records(vec![Record::new().with("v2000", "5")]);
        let chart = TimelineSpec::new(SeriesSpec::new("v", 2000, 2001))
            .build(&records)
            .unwrap();
        assert_eq!(chart.points[1].value, None);
        assert_eq!(chart.points[1].py, None);
    }

    #[test]
    fn test_empty_and_invalid() {
        let spec = TimelineSpec::new(fixtures::forest_series());
        assert!(spec.build(&RecordSet::default()).unwrap_err().is_no_data());

        let err = TimelineSpec::new(SeriesSpec::new("v", 2001, 2000))
            .build(&fixtures::countries())
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }
}
