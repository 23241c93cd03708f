//! Chart projector: lays two calendar years of monthly hours over one shared
//! twelve-month axis.
//!
//! Each point keeps its month and day and is re-keyed onto the reference year, so
//! the current year and the prior year can be compared month for month.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::profile::raw::{Connection, RawPeriodTotal};

pub const DEFAULT_TICK_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyHoursPoint {
    pub date: NaiveDate,
    pub hours: f64,
}

/// One named monthly-hours series, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub label: String,
    pub points: Vec<MonthlyHoursPoint>,
}

impl MonthlySeries {
    /// The `year` slice of a date-period aggregation, labelled by the year.
    /// Nodes without a period, or whose midpoint falls in another year, are skipped.
    pub fn from_connection(year: i32, conn: &Connection<RawPeriodTotal>) -> Self {
        Self {
            label: year.to_string(),
            points: conn
                .nodes()
                .filter_map(|n| {
                    n.date_period.as_ref().map(|p| MonthlyHoursPoint {
                        date: p.midpoint,
                        hours: n.hours,
                    })
                })
                .filter(|p| p.date.year() == year)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub date: NaiveDate,
    pub label: String,
}

/// Fixed x domain plus the y floor, handed to the charting collaborator as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisConfig {
    pub x_min: NaiveDate,
    pub x_max: NaiveDate,
    pub ticks: Vec<AxisTick>,
    pub y_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub reference_year: i32,
    pub series: Vec<MonthlySeries>,
    pub axis: AxisConfig,
}

impl ChartArtifact {
    /// Largest value over all series, never below the y floor.
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.hours))
            .fold(self.axis.y_min, f64::max)
    }
}

/// Keeps month and day, replaces the year. February 29 lands on February 28
/// when the reference year is not a leap year.
pub fn project_onto_year(date: NaiveDate, reference_year: i32) -> NaiveDate {
    date.with_year(reference_year)
        .or_else(|| NaiveDate::from_ymd_opt(reference_year, date.month(), 28))
        .unwrap_or(date)
}

pub fn project_series(series: &MonthlySeries, reference_year: i32) -> MonthlySeries {
    MonthlySeries {
        label: series.label.clone(),
        points: series
            .points
            .iter()
            .map(|p| MonthlyHoursPoint {
                date: project_onto_year(p.date, reference_year),
                hours: p.hours,
            })
            .collect(),
    }
}

/// January 1 through December 31 of `year`, with `tick_count` evenly spaced ticks
/// labelled by abbreviated month name.
pub fn axis_for_year(year: i32, tick_count: usize) -> Option<AxisConfig> {
    let x_min = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let x_max = NaiveDate::from_ymd_opt(year, 12, 31)?;
    let start = x_min.and_hms_opt(0, 0, 0)?;
    let span = x_max.and_hms_opt(0, 0, 0)? - start;

    let ticks = match tick_count {
        0 => Vec::new(),
        1 => vec![tick_at(x_min)],
        n => {
            let step_secs = span.num_seconds() / (n as i64 - 1);
            (0..n as i64)
                .map(|i| tick_at((start + Duration::seconds(step_secs * i)).date()))
                .collect()
        }
    };

    Some(AxisConfig {
        x_min,
        x_max,
        ticks,
        y_min: 0.0,
    })
}

fn tick_at(date: NaiveDate) -> AxisTick {
    AxisTick {
        date,
        label: date.format("%b").to_string(),
    }
}

/// Builds the comparison chart, or `None` when neither year has any hours.
/// Empty series are left out of the artifact.
pub fn project_chart(
    current: &MonthlySeries,
    prior: &MonthlySeries,
    reference_year: i32,
) -> Option<ChartArtifact> {
    if current.is_empty() && prior.is_empty() {
        return None;
    }

    let axis = axis_for_year(reference_year, DEFAULT_TICK_COUNT)?;
    let series = [current, prior]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| project_series(s, reference_year))
        .collect();

    Some(ChartArtifact {
        reference_year,
        series,
        axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(label: &str, points: &[(NaiveDate, f64)]) -> MonthlySeries {
        MonthlySeries {
            label: label.to_string(),
            points: points
                .iter()
                .map(|&(date, hours)| MonthlyHoursPoint { date, hours })
                .collect(),
        }
    }

    #[test]
    fn test_both_series_empty_produces_no_chart() {
        let empty_a = series("2023", &[]);
        let empty_b = series("2022", &[]);
        assert!(project_chart(&empty_a, &empty_b, 2023).is_none());
    }

    #[test]
    fn test_only_non_empty_series_is_charted() {
        let current = series(
            "2023",
            &[
                (date(2023, 1, 16), 150.0),
                (date(2023, 2, 14), 140.5),
                (date(2023, 3, 16), 160.0),
            ],
        );
        let prior = series("2022", &[]);
        let chart = project_chart(&current, &prior, 2023).unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, "2023");
        assert_eq!(chart.series[0].points.len(), 3);
        assert_eq!(chart.axis.x_min, date(2023, 1, 1));
        assert_eq!(chart.axis.x_max, date(2023, 12, 31));
    }

    #[test]
    fn test_prior_year_points_land_on_reference_year() {
        let current = series("2023", &[(date(2023, 1, 16), 1.0)]);
        let prior = series("2022", &[(date(2022, 7, 16), 120.0), (date(2022, 12, 16), 80.0)]);
        let chart = project_chart(&current, &prior, 2023).unwrap();
        let projected: Vec<_> = chart.series[1].points.iter().map(|p| p.date).collect();
        assert_eq!(projected, vec![date(2023, 7, 16), date(2023, 12, 16)]);
        assert_eq!(chart.series[1].points[0].hours, 120.0);
    }

    #[test]
    fn test_leap_day_clamps_to_february_28() {
        assert_eq!(project_onto_year(date(2024, 2, 29), 2023), date(2023, 2, 28));
        assert_eq!(project_onto_year(date(2023, 2, 28), 2024), date(2024, 2, 28));
    }

    #[test]
    fn test_axis_has_six_month_labelled_ticks() {
        let axis = axis_for_year(2023, DEFAULT_TICK_COUNT).unwrap();
        let labels: Vec<_> = axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan", "Mar", "May", "Aug", "Oct", "Dec"]);
        assert_eq!(axis.ticks.first().unwrap().date, date(2023, 1, 1));
        assert_eq!(axis.ticks.last().unwrap().date, date(2023, 12, 31));
        assert_eq!(axis.y_min, 0.0);
    }

    #[test]
    fn test_axis_degenerate_tick_counts() {
        assert!(axis_for_year(2023, 0).unwrap().ticks.is_empty());
        assert_eq!(axis_for_year(2023, 1).unwrap().ticks.len(), 1);
    }

    #[test]
    fn test_y_max_never_below_floor() {
        let current = series("2023", &[(date(2023, 1, 16), 0.0)]);
        let chart = project_chart(&current, &series("2022", &[]), 2023).unwrap();
        assert_eq!(chart.y_max(), 0.0);
        let current = series("2023", &[(date(2023, 1, 16), 42.0), (date(2023, 2, 14), 7.0)]);
        let chart = project_chart(&current, &series("2022", &[]), 2023).unwrap();
        assert_eq!(chart.y_max(), 42.0);
    }

    #[test]
    fn test_series_from_connection_skips_nodes_without_period() {
        let conn: Connection<RawPeriodTotal> = serde_json::from_value(serde_json::json!({
            "totalCount": 2,
            "edges": [
                { "node": { "hours": "12.5", "datePeriod": { "midpoint": "2022-01-16" } } },
                { "node": { "hours": 3, "datePeriod": null } }
            ]
        }))
        .unwrap();
        let s = MonthlySeries::from_connection(2022, &conn);
        assert_eq!(
            s.points,
            vec![MonthlyHoursPoint {
                date: date(2022, 1, 16),
                hours: 12.5
            }]
        );
    }

    #[test]
    fn test_series_from_connection_drops_buckets_outside_its_year() {
        let conn: Connection<RawPeriodTotal> = serde_json::from_value(serde_json::json!({
            "edges": [
                { "node": { "hours": 100, "datePeriod": { "midpoint": "2023-06-16" } } },
                { "node": { "hours": 110, "datePeriod": { "midpoint": "2024-01-16" } } },
                { "node": { "hours": 120, "datePeriod": { "midpoint": "2026-09-15" } } }
            ]
        }))
        .unwrap();
        let current = MonthlySeries::from_connection(2023, &conn);
        let chart = project_chart(&current, &series("2022", &[]), 2023).unwrap();
        let dates: Vec<_> = chart.series[0].points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2023, 6, 16)]);
    }
}
