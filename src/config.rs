use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://jrapi-dev-2006.azurewebsites.net";
pub const DEFAULT_CACHE_PATH: &str = "dcps_dashboard_data.csv";
const DEFAULT_START: &str = "2021-08-10";
const DEFAULT_END: &str = "2022-05-31";

/// Calendar month addressed by one request to the reporting endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReportMonth {
    pub year: i32,
    pub month: u32,
}

impl ReportMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// First and last day of school.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcademicWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AcademicWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, AppError> {
        if start_date > end_date {
            return Err(AppError::Config(format!(
                "window start {} is after window end {}",
                start_date, end_date
            )));
        }
        Ok(Self { start_date, end_date })
    }

    /// The last day of school, or `today` while the year is still running.
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.end_date.min(today)
    }

    /// Every month whose first day falls on or before the effective end,
    /// starting with the month of the first day of school.
    pub fn months(&self, today: NaiveDate) -> Vec<ReportMonth> {
        let end = self.effective_end(today);
        let mut months = Vec::new();

        let Some(mut cursor) = self.start_date.with_day(1) else {
            return months;
        };

        while cursor <= end {
            months.push(ReportMonth::new(cursor.year(), cursor.month()));
            cursor = match cursor.checked_add_months(Months::new(1)) {
                Some(next) => next,
                None => break,
            };
        }

        months
    }
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl ReportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub report: ReportConfig,
    pub window: AcademicWindow,
    pub cache_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CASES_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let start_date = parse_date(
            "SCHOOL_YEAR_START",
            &lookup("SCHOOL_YEAR_START").unwrap_or_else(|| DEFAULT_START.to_string()),
        )?;
        let end_date = parse_date(
            "SCHOOL_YEAR_END",
            &lookup("SCHOOL_YEAR_END").unwrap_or_else(|| DEFAULT_END.to_string()),
        )?;
        let window = AcademicWindow::new(start_date, end_date)?;

        // An explicitly empty path turns the cache off.
        let cache_path = match lookup("CASES_CACHE_PATH") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_CACHE_PATH)),
        };

        let max_retries: u32 =
            parse_number("CASES_FETCH_RETRIES", lookup("CASES_FETCH_RETRIES"), 0)?;
        let retry_delay_ms: u64 =
            parse_number("CASES_RETRY_DELAY_MS", lookup("CASES_RETRY_DELAY_MS"), 500)?;
        let timeout_secs: u64 = parse_number(
            "CASES_REQUEST_TIMEOUT_SECS",
            lookup("CASES_REQUEST_TIMEOUT_SECS"),
            30,
        )?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        Ok(Self {
            report: ReportConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                max_retries,
                retry_delay: Duration::from_millis(retry_delay_ms),
            },
            window,
            cache_path,
            bind_addr,
        })
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::Config(format!("{} must be YYYY-MM-DD: {}", key, e)))
}

fn parse_number<T>(key: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("{} is not a number: {}", key, e))),
        None => Ok(default),
    }
}
