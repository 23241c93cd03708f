//! Query definition for the employee profile card.
//!
//! One `me` operation fetches everything the card needs in a single round trip:
//! identity and contact fields, the first education entries, the top projects
//! by hours, two monthly-hours series and the two role counts.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};

/// Name of the primary operation sent to the backend.
pub const ME_OPERATION: &str = "me";

pub const SIGN_IN_OPERATION: &str = "signIn";

/// Exchanges the long-lived refresh credential for a session bearer token.
pub const SIGN_IN_MUTATION: &str = "\
mutation signIn {
  signIn {
    token {
      token
    }
  }
}";

/// Inclusive calendar-date range used in `date: { between: [...] }` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Fixed policies baked into the `me` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    /// Year whose hours run from January 1 through `$endOfLastMonth`.
    pub current_year: i32,
    /// Year whose hours are fetched in full for comparison.
    pub prior_year: i32,
    pub top_projects_window: DateWindow,
    pub education_limit: u32,
    pub top_projects_limit: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            current_year: 2023,
            prior_year: 2022,
            top_projects_window: DateWindow {
                from: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
                to: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            },
            education_limit: 5,
            top_projects_limit: 5,
        }
    }
}

/// Variables for the `me` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeVariables {
    #[serde(rename = "endOfLastMonth", serialize_with = "iso_date")]
    pub end_of_last_month: NaiveDate,
}

impl MeVariables {
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            end_of_last_month: end_of_last_month(today),
        }
    }
}

fn iso_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

/// Last calendar day of the month preceding `today`.
pub fn end_of_last_month(today: NaiveDate) -> NaiveDate {
    // Day 1 always exists, so `with_day(1)` cannot fail here.
    let first_of_month = today.with_day(1).unwrap_or(today);
    first_of_month - Duration::days(1)
}

const DATE_PERIOD_FRAGMENT: &str = "\
fragment timeEntriesTotalsForDatePeriodFields on TimeEntriesTotalsInterfacePaginationConnection {
  totalCount
  edges {
    node {
      hours
      ... on TimeEntriesTotalsForDatePeriod {
        datePeriod {
          midpoint
        }
      }
    }
  }
}";

const EMPLOYEE_FRAGMENT_TEMPLATE: &str = "\
fragment employeeFields on Employee {
  profilePicture
  fakeProfilePicture: profilePicture(fake: DICEBEAR_MICAH)
  byname
  lastName
  jobTitle
  email
  city
  state
  office {
    nickname
  }
  workPhone {
    number
    extension
  }
  team {
    name
  }
  trainings
  tenure {
    currentExperienceAdjustedDateRange {
      startDate
    }
    previousExperience
  }
  education(pagination: { first: {education_limit} }) {
    edges {
      node {
        degrees
        almaMater {
          name
        }
      }
    }
  }
  topProjects: timeEntriesTotalsAggregated(
    aggregationMode: BY_PROJECT
    filters: {
      date: { between: [\"{top_from}\", \"{top_to}\"] }
      chargedToVacationProject: { eq: false }
    }
    sorts: [{ hours: DESCENDING }]
    pagination: { first: {top_projects_limit} }
  ) {
    totalCount
    edges {
      node {
        hours
        ... on TimeEntriesTotalsForProject {
          project {
            name
            parentProject {
              name
            }
          }
        }
      }
    }
  }
  currentYearHours: timeEntriesTotalsAggregated(
    aggregationMode: BY_DATE_PERIOD
    periodicity: MONTHLY
    filters: {
      date: { between: [\"{current_from}\", $endOfLastMonth] }
      chargedToVacationProject: { eq: false }
    }
    sorts: [{ datePeriod: ASCENDING }]
  ) {
    ...timeEntriesTotalsForDatePeriodFields
  }
  priorYearHours: timeEntriesTotalsAggregated(
    aggregationMode: BY_DATE_PERIOD
    periodicity: MONTHLY
    filters: {
      date: { between: [\"{prior_from}\", \"{prior_to}\"] }
      chargedToVacationProject: { eq: false }
    }
    sorts: [{ datePeriod: ASCENDING }]
  ) {
    ...timeEntriesTotalsForDatePeriodFields
  }
  mentoredEmployeesCount: employeesWithRoles(
    filters: { roles: { in: [ONBOARDING_MENTOR, DEPARTMENT_MENTOR] } }
  ) {
    totalCount
  }
  managedEmployeesCount: employeesWithRoles(filters: { roles: { in: [MANAGER] } }) {
    totalCount
  }
}";

const ME_QUERY_HEAD: &str = "\
query me($endOfLastMonth: Date!) {
  me {
    ...employeeFields
  }
}";

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Renders the complete `me` document, fragments included.
pub fn build_me_query(settings: &QuerySettings) -> String {
    let window = settings.top_projects_window;
    let employee = EMPLOYEE_FRAGMENT_TEMPLATE
        .replace("{education_limit}", &settings.education_limit.to_string())
        .replace("{top_projects_limit}", &settings.top_projects_limit.to_string())
        .replace("{top_from}", &iso(window.from))
        .replace("{top_to}", &iso(window.to))
        .replace("{current_from}", &format!("{:04}-01-01", settings.current_year))
        .replace("{prior_from}", &format!("{:04}-01-01", settings.prior_year))
        .replace("{prior_to}", &format!("{:04}-12-31", settings.prior_year));

    format!("{ME_QUERY_HEAD}\n\n{employee}\n\n{DATE_PERIOD_FRAGMENT}\n")
}
