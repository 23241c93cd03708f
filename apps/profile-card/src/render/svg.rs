//! Inline SVG line chart for the monthly-hours comparison.
//!
//! One polyline per series over the artifact's fixed January–December domain,
//! a shared y axis starting at the artifact's floor, and month tick labels.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::chart::ChartArtifact;
use crate::render::escape_html;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 240.0;
const MARGIN_LEFT: f64 = 44.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 28.0;
const PALETTE: &[&str] = &["#2563eb", "#9ca3af", "#16a34a", "#dc2626"];

struct Plot {
    x_min: NaiveDate,
    x_span_days: f64,
    y_min: f64,
    y_span: f64,
}

impl Plot {
    fn new(chart: &ChartArtifact) -> Self {
        let x_span_days = (chart.axis.x_max - chart.axis.x_min).num_days().max(1) as f64;
        let y_min = chart.axis.y_min;
        let y_max = chart.y_max();
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };
        Self {
            x_min: chart.axis.x_min,
            x_span_days,
            y_min,
            y_span,
        }
    }

    fn x(&self, date: NaiveDate) -> f64 {
        let days = (date - self.x_min).num_days() as f64;
        MARGIN_LEFT + (days / self.x_span_days).clamp(0.0, 1.0) * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn y(&self, value: f64) -> f64 {
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let ratio = ((value - self.y_min) / self.y_span).clamp(0.0, 1.0);
        MARGIN_TOP + plot_h - ratio * plot_h
    }
}

pub fn render_chart_svg(chart: &ChartArtifact) -> String {
    let plot = Plot::new(chart);
    let mut svg = String::new();

    let _ = write!(
        svg,
        r#"<svg class="hours-chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="Monthly hours">"#
    );

    // Axes
    let baseline = plot.y(chart.axis.y_min);
    let _ = write!(
        svg,
        r##"<line class="axis" x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="#6b7280"/>"##,
        WIDTH - MARGIN_RIGHT
    );
    let _ = write!(
        svg,
        r##"<line class="axis" x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline:.1}" stroke="#6b7280"/>"##
    );

    for tick in &chart.axis.ticks {
        let x = plot.x(tick.date);
        let _ = write!(
            svg,
            r#"<text class="tick" x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"#,
            HEIGHT - 8.0,
            escape_html(&tick.label)
        );
    }

    let y_top = plot.y_min + plot.y_span;
    for value in [plot.y_min, y_top] {
        let _ = write!(
            svg,
            r#"<text class="tick" x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{value:.0}</text>"#,
            MARGIN_LEFT - 6.0,
            plot.y(value) + 4.0
        );
    }

    for (i, series) in chart.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points = series
            .points
            .iter()
            .map(|p| format!("{:.1},{:.1}", plot.x(p.date), plot.y(p.hours)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            svg,
            r#"<polyline class="series" data-series="{label}" fill="none" stroke="{color}" stroke-width="2" points="{points}"/>"#,
            label = escape_html(&series.label)
        );
        let legend_x = MARGIN_LEFT + 8.0 + i as f64 * 72.0;
        let _ = write!(
            svg,
            r#"<text class="legend" x="{legend_x:.1}" y="14" font-size="12" fill="{color}">{}</text>"#,
            escape_html(&series.label)
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{project_chart, MonthlyHoursPoint, MonthlySeries};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chart() -> ChartArtifact {
        let current = MonthlySeries {
            label: "2023".to_string(),
            points: vec![
                MonthlyHoursPoint {
                    date: date(2023, 1, 16),
                    hours: 100.0,
                },
                MonthlyHoursPoint {
                    date: date(2023, 2, 14),
                    hours: 150.0,
                },
            ],
        };
        let prior = MonthlySeries {
            label: "2022".to_string(),
            points: vec![MonthlyHoursPoint {
                date: date(2022, 1, 16),
                hours: 120.0,
            }],
        };
        project_chart(&current, &prior, 2023).unwrap()
    }

    #[test]
    fn test_one_polyline_per_series() {
        let svg = render_chart_svg(&chart());
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r#"data-series="2023""#));
        assert!(svg.contains(r#"data-series="2022""#));
    }

    #[test]
    fn test_tick_labels_rendered() {
        let svg = render_chart_svg(&chart());
        for label in ["Jan", "Mar", "May", "Aug", "Oct", "Dec"] {
            assert!(svg.contains(&format!(">{label}</text>")), "missing {label}");
        }
    }

    #[test]
    fn test_points_stay_inside_plot_area() {
        let c = chart();
        let plot = Plot::new(&c);
        assert_eq!(plot.x(c.axis.x_min), MARGIN_LEFT);
        assert_eq!(plot.x(c.axis.x_max), WIDTH - MARGIN_RIGHT);
        assert_eq!(plot.y(0.0), HEIGHT - MARGIN_BOTTOM);
        assert_eq!(plot.y(150.0), MARGIN_TOP);
    }

    #[test]
    fn test_flat_zero_series_does_not_divide_by_zero() {
        let current = MonthlySeries {
            label: "2023".to_string(),
            points: vec![MonthlyHoursPoint {
                date: date(2023, 5, 16),
                hours: 0.0,
            }],
        };
        let prior = MonthlySeries {
            label: "2022".to_string(),
            points: Vec::new(),
        };
        let svg = render_chart_svg(&project_chart(&current, &prior, 2023).unwrap());
        assert!(!svg.contains("NaN"));
    }
}
