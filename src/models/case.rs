use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day with at least one reported case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCaseRecord {
    pub date: NaiveDate,
    pub students: u32,
    pub staff: u32,
    pub total: u32,
    /// `(total - previous_total) / total`, where the previous total is the
    /// last emitted day's total (0 before the first).
    #[serde(alias = "perc_diff")]
    pub percent_change: f64,
    pub day_of_week: String,
}

impl DailyCaseRecord {
    pub fn new(date: NaiveDate, students: u32, staff: u32, total: u32, previous_total: u32) -> Self {
        Self {
            date,
            students,
            staff,
            total,
            percent_change: percent_change(total, previous_total),
            day_of_week: date.format("%A").to_string(),
        }
    }
}

/// Callers only pass `total > 0`.
pub fn percent_change(total: u32, previous_total: u32) -> f64 {
    (total as f64 - previous_total as f64) / total as f64
}
