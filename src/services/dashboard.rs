use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::AppError;
use crate::models::{
    CaseTotals, DailyCaseRecord, DashboardSummary, MonthlyCases, RollingPoint, WeeklyCases,
};

/// Weekday names in the order they first show up.
pub fn weekday_options(records: &[DailyCaseRecord]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for record in records {
        if !options.contains(&record.day_of_week) {
            options.push(record.day_of_week.clone());
        }
    }
    options
}

/// Accepts full names or common abbreviations, any case.
pub fn parse_weekdays(names: &str) -> Result<Vec<Weekday>, AppError> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Weekday>()
                .map_err(|_| AppError::BadRequest(format!("Unknown day of week: {}", name)))
        })
        .collect()
}

pub fn filter_by_weekdays(records: &[DailyCaseRecord], days: &[Weekday]) -> Vec<DailyCaseRecord> {
    records
        .iter()
        .filter(|record| days.contains(&record.date.weekday()))
        .cloned()
        .collect()
}

pub fn monthly_cases(records: &[DailyCaseRecord]) -> Vec<MonthlyCases> {
    let mut groups: BTreeMap<(i32, u32), MonthlyCases> = BTreeMap::new();

    for record in records {
        let key = (record.date.year(), record.date.month());
        let entry = groups.entry(key).or_insert_with(|| MonthlyCases {
            year: key.0,
            month: key.1,
            students: 0,
            staff: 0,
            total: 0,
            days_reported: 0,
        });
        entry.students += record.students as u64;
        entry.staff += record.staff as u64;
        entry.total += record.total as u64;
        entry.days_reported += 1;
    }

    groups.into_values().collect()
}

pub fn weekly_cases(records: &[DailyCaseRecord]) -> Vec<WeeklyCases> {
    let mut groups: BTreeMap<(i32, u32), WeeklyCases> = BTreeMap::new();

    for record in records {
        let iso = record.date.iso_week();
        let key = (iso.year(), iso.week());
        let entry = groups.entry(key).or_insert_with(|| WeeklyCases {
            iso_year: key.0,
            week: key.1,
            week_start: week_start(record.date),
            students: 0,
            staff: 0,
            total: 0,
            days_reported: 0,
        });
        entry.students += record.students as u64;
        entry.staff += record.staff as u64;
        entry.total += record.total as u64;
        entry.days_reported += 1;
    }

    groups.into_values().collect()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Trailing mean of `total` over the last `window` reported days.
pub fn rolling_average(records: &[DailyCaseRecord], window: usize) -> Vec<RollingPoint> {
    let window = window.max(1);
    let mut sum: u64 = 0;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            sum += record.total as u64;
            if i >= window {
                sum -= records[i - window].total as u64;
            }
            let len = (i + 1).min(window);
            RollingPoint {
                date: record.date,
                total: record.total,
                average: sum as f64 / len as f64,
            }
        })
        .collect()
}

pub fn summarize(records: &[DailyCaseRecord], as_of: NaiveDate) -> DashboardSummary {
    let mut totals = CaseTotals::default();
    let mut peak: Option<&DailyCaseRecord> = None;

    for record in records {
        totals.add(record.students, record.staff, record.total);
        if peak.is_none_or(|p| record.total > p.total) {
            peak = Some(record);
        }
    }

    DashboardSummary {
        as_of,
        days_reported: records.len(),
        totals,
        latest: records.last().cloned(),
        peak: peak.cloned(),
    }
}
