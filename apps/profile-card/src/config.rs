use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::profile::normalize::DEFAULT_FALLBACK_PHONE;
use crate::profile::query::{DateWindow, QuerySettings};

/// Application configuration loaded from environment variables.
/// Startup fails if the GraphQL endpoint or the refresh credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub graphql_uri: String,
    pub refresh_token: String,
    pub port: u16,
    pub rust_log: String,
    /// Calendar year whose monthly hours are compared against the year before it.
    pub profile_year: i32,
    pub top_projects_from: NaiveDate,
    pub top_projects_to: NaiveDate,
    pub fallback_phone: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            graphql_uri: require_env("GRAPHQL_URI")?,
            refresh_token: require_env("REFRESH_TOKEN")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            profile_year: std::env::var("PROFILE_YEAR")
                .unwrap_or_else(|_| "2023".to_string())
                .parse::<i32>()
                .context("PROFILE_YEAR must be a calendar year")?,
            top_projects_from: optional_date("TOP_PROJECTS_FROM", "2022-01-01")?,
            top_projects_to: optional_date("TOP_PROJECTS_TO", "2023-12-31")?,
            fallback_phone: std::env::var("FALLBACK_PHONE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_PHONE.to_string()),
        };

        if config.top_projects_from > config.top_projects_to {
            anyhow::bail!(
                "TOP_PROJECTS_FROM ({}) is after TOP_PROJECTS_TO ({})",
                config.top_projects_from,
                config.top_projects_to
            );
        }

        Ok(config)
    }

    /// The query policy derived from this configuration.
    pub fn query_settings(&self) -> QuerySettings {
        QuerySettings {
            current_year: self.profile_year,
            prior_year: self.profile_year - 1,
            top_projects_window: DateWindow {
                from: self.top_projects_from,
                to: self.top_projects_to,
            },
            ..QuerySettings::default()
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_date(key: &str, default: &str) -> Result<NaiveDate> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .with_context(|| format!("{key} must be an ISO date (YYYY-MM-DD), got '{raw}'"))
}
