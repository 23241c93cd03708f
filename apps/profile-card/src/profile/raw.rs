//! Wire shapes of the `me` response. Field names follow the backend schema;
//! everything optional on the server is optional here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub me: Option<RawEmployee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(rename = "signIn")]
    pub sign_in: Option<SignInPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInPayload {
    pub token: Option<TokenPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    pub token: Option<String>,
}

/// A paginated connection: list items wrapped in `edges[].node`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            total_count: None,
            edges: Vec::new(),
        }
    }
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    /// Server-reported total, falling back to the number of edges received.
    pub fn count(&self) -> u32 {
        self.total_count.unwrap_or(self.edges.len() as u32)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Connection used only for its `totalCount`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountOnly {
    #[serde(default)]
    pub total_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmployee {
    pub profile_picture: Option<String>,
    pub fake_profile_picture: Option<String>,
    pub byname: String,
    pub last_name: String,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub office: Option<RawOffice>,
    pub work_phone: Option<RawPhone>,
    pub team: Option<RawTeam>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trainings: Vec<String>,
    pub tenure: Option<RawTenure>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Connection<RawEducation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_projects: Connection<RawProjectTotal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_year_hours: Connection<RawPeriodTotal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prior_year_hours: Connection<RawPeriodTotal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mentored_employees_count: CountOnly,
    #[serde(default, deserialize_with = "null_as_default")]
    pub managed_employees_count: CountOnly,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOffice {
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhone {
    pub number: Option<String>,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTenure {
    pub current_experience_adjusted_date_range: Option<RawDateRange>,
    /// Pre-hire experience in months.
    pub previous_experience: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDateRange {
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEducation {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub degrees: Vec<String>,
    pub alma_mater: Option<RawNamed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProjectTotal {
    #[serde(deserialize_with = "decode_hours")]
    pub hours: f64,
    pub project: Option<RawProject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    pub name: Option<String>,
    pub parent_project: Option<RawNamed>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPeriodTotal {
    #[serde(deserialize_with = "decode_hours")]
    pub hours: f64,
    pub date_period: Option<RawDatePeriod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDatePeriod {
    #[serde(deserialize_with = "calendar_date")]
    pub midpoint: NaiveDate,
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding helpers
// ────────────────────────────────────────────────────────────────────────────

/// Parses a timezone-naive calendar date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS`
/// timestamp. For timestamps only the written date is kept; the offset is ignored.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn calendar_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| de::Error::custom(format!("malformed calendar date '{raw}'")))
}

fn optional_calendar_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_calendar_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("malformed calendar date '{raw}'"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Hours arrive either as a JSON number or as a decimal string.
fn decode_hours<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match Option::<NumberOrString>::deserialize(deserializer)? {
        None => 0.0,
        Some(NumberOrString::Number(n)) => n,
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("malformed hours value '{s}'")))?,
    };
    if !value.is_finite() {
        return Err(de::Error::custom("hours value is not finite"));
    }
    Ok(value)
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
