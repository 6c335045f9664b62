use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ReportMonth;
use crate::models::DailyCaseRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaseTotals {
    pub cases: u64,
    pub students: u64,
    pub staff: u64,
}

impl CaseTotals {
    pub fn add(&mut self, students: u32, staff: u32, total: u32) {
        self.cases += total as u64;
        self.students += students as u64;
        self.staff += staff as u64;
    }

    pub fn merge(&mut self, other: &CaseTotals) {
        self.cases += other.cases;
        self.students += other.students;
        self.staff += other.staff;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: ReportMonth,
    pub totals: CaseTotals,
}

/// Output of one pass over the academic-year window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseReport {
    pub records: Vec<DailyCaseRecord>,
    pub months: Vec<MonthlySummary>,
    pub totals: CaseTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCases {
    pub year: i32,
    pub month: u32,
    pub students: u64,
    pub staff: u64,
    pub total: u64,
    pub days_reported: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyCases {
    pub iso_year: i32,
    pub week: u32,
    pub week_start: NaiveDate,
    pub students: u64,
    pub staff: u64,
    pub total: u64,
    pub days_reported: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub total: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    pub days_reported: usize,
    pub totals: CaseTotals,
    pub latest: Option<DailyCaseRecord>,
    pub peak: Option<DailyCaseRecord>,
}
