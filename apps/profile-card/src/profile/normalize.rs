//! Response normalizer: flattens one `me` employee record into view-ready sections.
//!
//! Missing-but-valid data (nulls, empty lists) is never an error here: every rule
//! below either substitutes a fixed fallback or omits the section.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::profile::raw::{RawEducation, RawEmployee, RawOffice, RawPhone, RawProjectTotal};

/// Shown when the employee has no work phone on file.
pub const DEFAULT_FALLBACK_PHONE: &str = "555-555-5555";
pub const REMOTE_LOCATION: &str = "Remote";
pub const NO_PREVIOUS_EXPERIENCE: &str = "No previous experience";
pub const DEGREE_SEPARATOR: &str = " • ";
const UNNAMED_PROJECT: &str = "Unnamed project";

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub fallback_phone: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            fallback_phone: DEFAULT_FALLBACK_PHONE.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// View records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub identity: IdentityView,
    pub contact: ContactView,
    pub education: Vec<EducationView>,
    pub trainings: Vec<String>,
    /// `None` when the employee neither manages nor mentors anyone.
    pub roles: Option<RolesView>,
    pub tenure: TenureView,
    /// `None` when no project hours were recorded in the window.
    pub top_projects: Option<Vec<TopProjectView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityView {
    pub full_name: String,
    pub job_title: Option<String>,
    pub team: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactView {
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    /// "City, State" when either part is known.
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationView {
    /// Lowercased degree labels joined with `DEGREE_SEPARATOR`, in server order.
    pub degrees: String,
    pub institution: Option<String>,
}

impl EducationView {
    pub fn display_degrees(&self) -> String {
        display_casing(&self.degrees)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RolesView {
    pub managed: u32,
    pub mentored: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureView {
    pub start_year: Option<i32>,
    pub previous_experience: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProjectView {
    pub name: String,
    pub hours: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

pub fn normalize(raw: &RawEmployee, options: &NormalizeOptions) -> ProfileView {
    let identity = IdentityView {
        full_name: format!("{} {}", raw.byname.trim(), raw.last_name.trim())
            .trim()
            .to_string(),
        job_title: raw.job_title.clone(),
        team: raw
            .team
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .map(|name| team_label(name).to_string()),
        picture: pick_picture(
            raw.profile_picture.as_deref(),
            raw.fake_profile_picture.as_deref(),
        )
        .map(str::to_string),
    };

    let contact = ContactView {
        phone: phone_label(raw.work_phone.as_ref(), &options.fallback_phone),
        email: raw.email.clone(),
        location: location_label(raw.office.as_ref()),
        address: address_label(raw.city.as_deref(), raw.state.as_deref()),
    };

    let education = raw.education.nodes().map(education_view).collect();

    let roles = roles_view(
        raw.managed_employees_count.total_count.unwrap_or(0),
        raw.mentored_employees_count.total_count.unwrap_or(0),
    );

    let tenure = match &raw.tenure {
        Some(t) => TenureView {
            start_year: tenure_start_year(
                t.current_experience_adjusted_date_range
                    .as_ref()
                    .and_then(|r| r.start_date),
            ),
            previous_experience: previous_experience_label(t.previous_experience),
        },
        None => TenureView {
            start_year: None,
            previous_experience: NO_PREVIOUS_EXPERIENCE.to_string(),
        },
    };

    let top_projects = if raw.top_projects.count() == 0 {
        None
    } else {
        Some(raw.top_projects.nodes().map(top_project_view).collect())
    };

    ProfileView {
        identity,
        contact,
        education,
        trainings: raw.trainings.clone(),
        roles,
        tenure,
        top_projects,
    }
}

/// Always returns the primary picture. The generated avatar is fetched alongside it
/// but is not used as a fallback.
pub fn pick_picture<'a>(primary: Option<&'a str>, _fallback: Option<&'a str>) -> Option<&'a str> {
    primary
}

pub fn team_label(name: &str) -> &str {
    if name == "Indirect" {
        "Support"
    } else {
        name
    }
}

pub fn degrees_label(degrees: &[String]) -> String {
    degrees
        .iter()
        .map(|d| d.to_lowercase())
        .collect::<Vec<_>>()
        .join(DEGREE_SEPARATOR)
}

/// Uppercases the first letter of the label and leaves the rest untouched.
pub fn display_casing(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn education_view(raw: &RawEducation) -> EducationView {
    EducationView {
        degrees: degrees_label(&raw.degrees),
        institution: raw.alma_mater.as_ref().and_then(|a| a.name.clone()),
    }
}

pub fn phone_label(phone: Option<&RawPhone>, fallback: &str) -> String {
    let Some(phone) = phone else {
        return fallback.to_string();
    };
    match phone.number.as_deref().map(str::trim) {
        Some(number) if !number.is_empty() => match phone.extension.as_deref().map(str::trim) {
            Some(ext) if !ext.is_empty() => format!("{number} x{ext}"),
            _ => number.to_string(),
        },
        _ => fallback.to_string(),
    }
}

pub fn location_label(office: Option<&RawOffice>) -> String {
    office
        .and_then(|o| o.nickname.as_deref())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(REMOTE_LOCATION)
        .to_string()
}

fn address_label(city: Option<&str>, state: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [city, state]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn roles_view(managed: u32, mentored: u32) -> Option<RolesView> {
    if managed == 0 && mentored == 0 {
        None
    } else {
        Some(RolesView { managed, mentored })
    }
}

/// Tenure is shown at year granularity.
pub fn tenure_start_year(start: Option<NaiveDate>) -> Option<i32> {
    start.map(|d| d.year())
}

/// Months of pre-hire experience, shown in years with one decimal.
pub fn previous_experience_label(months: Option<f64>) -> String {
    match months {
        Some(m) if m > 0.0 => format!("{:.1} years", m / 12.0),
        _ => NO_PREVIOUS_EXPERIENCE.to_string(),
    }
}

/// Sub-projects roll up to their parent's name.
pub fn project_display_name(raw: &RawProjectTotal) -> String {
    let project = raw.project.as_ref();
    let parent_name = project
        .and_then(|p| p.parent_project.as_ref())
        .and_then(|p| p.name.clone());
    parent_name
        .or_else(|| project.and_then(|p| p.name.clone()))
        .unwrap_or_else(|| UNNAMED_PROJECT.to_string())
}

pub fn round_hours(hours: f64) -> i64 {
    hours.round() as i64
}

fn top_project_view(raw: &RawProjectTotal) -> TopProjectView {
    TopProjectView {
        name: project_display_name(raw),
        hours: round_hours(raw.hours),
    }
}
