//! Section visibility. The renderer and the JSON API both ask `is_visible`
//! instead of checking section data themselves.

use serde::Serialize;

use crate::chart::ChartArtifact;
use crate::profile::normalize::ProfileView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Identity,
    Contact,
    Education,
    Trainings,
    Roles,
    Tenure,
    TopProjects,
    HoursChart,
}

impl Section {
    /// Render order of the card.
    pub const ALL: [Section; 8] = [
        Section::Identity,
        Section::Contact,
        Section::Tenure,
        Section::Roles,
        Section::Education,
        Section::Trainings,
        Section::TopProjects,
        Section::HoursChart,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Identity => "Profile",
            Section::Contact => "Contact",
            Section::Education => "Education",
            Section::Trainings => "Trainings",
            Section::Roles => "Roles",
            Section::Tenure => "Tenure",
            Section::TopProjects => "Top projects",
            Section::HoursChart => "Monthly hours",
        }
    }
}

/// Sections with a zero state (roles, top projects, hours chart) are omitted
/// entirely when that state applies; the others always render.
pub fn is_visible(section: Section, profile: &ProfileView, chart: Option<&ChartArtifact>) -> bool {
    match section {
        Section::Identity
        | Section::Contact
        | Section::Education
        | Section::Trainings
        | Section::Tenure => true,
        Section::Roles => profile
            .roles
            .is_some_and(|r| r.managed > 0 || r.mentored > 0),
        Section::TopProjects => profile
            .top_projects
            .as_ref()
            .is_some_and(|p| !p.is_empty()),
        Section::HoursChart => chart.is_some_and(|c| !c.series.is_empty()),
    }
}

pub fn visible_sections(profile: &ProfileView, chart: Option<&ChartArtifact>) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|&s| is_visible(s, profile, chart))
        .collect()
}
