//! Employee profile card: query shape, wire types, normalization and section visibility.
//! The backend is reached only through `ProfileSource`.

pub mod normalize;
pub mod query;
pub mod raw;
pub mod sections;
pub mod source;

use serde::Serialize;

use crate::chart::{project_chart, ChartArtifact, MonthlySeries};
use crate::profile::normalize::{normalize, NormalizeOptions, ProfileView};
use crate::profile::query::QuerySettings;
use crate::profile::raw::RawEmployee;
use crate::profile::sections::{visible_sections, Section};

/// Everything the renderer needs for one page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub profile: ProfileView,
    pub chart: Option<ChartArtifact>,
    pub sections: Vec<Section>,
}

impl ProfileCard {
    pub fn shows(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }
}

pub fn build_card(
    raw: &RawEmployee,
    options: &NormalizeOptions,
    settings: &QuerySettings,
) -> ProfileCard {
    let profile = normalize(raw, options);

    let current = MonthlySeries::from_connection(settings.current_year, &raw.current_year_hours);
    let prior = MonthlySeries::from_connection(settings.prior_year, &raw.prior_year_hours);
    let chart = project_chart(&current, &prior, settings.current_year);

    let sections = visible_sections(&profile, chart.as_ref());

    ProfileCard {
        profile,
        chart,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(hours_current: serde_json::Value, hours_prior: serde_json::Value) -> RawEmployee {
        serde_json::from_value(json!({
            "byname": "Grace",
            "lastName": "Hopper",
            "currentYearHours": hours_current,
            "priorYearHours": hours_prior,
            "topProjects": { "totalCount": 0, "edges": [] },
            "mentoredEmployeesCount": { "totalCount": 0 },
            "managedEmployeesCount": { "totalCount": 0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_card_without_hours_has_no_chart() {
        let card = build_card(
            &raw(json!({ "totalCount": 0, "edges": [] }), json!(null)),
            &NormalizeOptions::default(),
            &QuerySettings::default(),
        );
        assert!(card.chart.is_none());
        assert!(!card.shows(Section::HoursChart));
        assert!(!card.shows(Section::Roles));
        assert!(!card.shows(Section::TopProjects));
        assert!(card.shows(Section::Contact));
    }

    #[test]
    fn test_card_charts_current_year_only() {
        let current = json!({ "totalCount": 3, "edges": [
            { "node": { "hours": "150", "datePeriod": { "midpoint": "2023-01-16" } } },
            { "node": { "hours": "140", "datePeriod": { "midpoint": "2023-02-14" } } },
            { "node": { "hours": "160", "datePeriod": { "midpoint": "2023-03-16" } } }
        ] });
        let card = build_card(
            &raw(current, json!({ "totalCount": 0, "edges": [] })),
            &NormalizeOptions::default(),
            &QuerySettings::default(),
        );
        let chart = card.chart.as_ref().unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, "2023");
        assert_eq!(chart.reference_year, 2023);
        assert!(card.shows(Section::HoursChart));
    }

    #[test]
    fn test_card_labels_series_by_configured_years() {
        let prior = json!({ "edges": [
            { "node": { "hours": 80, "datePeriod": { "midpoint": "2024-02-29" } } }
        ] });
        let settings = QuerySettings {
            current_year: 2025,
            prior_year: 2024,
            ..QuerySettings::default()
        };
        let card = build_card(
            &raw(json!(null), prior),
            &NormalizeOptions::default(),
            &settings,
        );
        let chart = card.chart.unwrap();
        assert_eq!(chart.series[0].label, "2024");
        assert_eq!(
            chart.series[0].points[0].date,
            chrono::NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_card_ignores_current_window_buckets_from_later_years() {
        let current = json!({ "edges": [
            { "node": { "hours": 100, "datePeriod": { "midpoint": "2023-06-16" } } },
            { "node": { "hours": 110, "datePeriod": { "midpoint": "2023-07-16" } } },
            { "node": { "hours": 90, "datePeriod": { "midpoint": "2024-01-16" } } },
            { "node": { "hours": 95, "datePeriod": { "midpoint": "2026-09-15" } } }
        ] });
        let card = build_card(
            &raw(current, json!(null)),
            &NormalizeOptions::default(),
            &QuerySettings::default(),
        );
        let chart = card.chart.unwrap();
        let dates: Vec<_> = chart.series[0].points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                chrono::NaiveDate::from_ymd_opt(2023, 6, 16).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2023, 7, 16).unwrap(),
            ]
        );
    }
}
