use chrono::NaiveDate;

use crate::config::ReportMonth;
use crate::error::AppError;
use crate::models::{CaseReport, CaseTotals, DailyCaseRecord, MonthlySummary};
use crate::report::dto::MonthlyReport;

/// Fold state for one pass over the window.
///
/// `previous_total` is carried across month boundaries and only moves on
/// days that are emitted, i.e. days with `total > 0`.
#[derive(Debug, Default)]
pub struct CaseAccumulator {
    previous_total: u32,
    records: Vec<DailyCaseRecord>,
    months: Vec<MonthlySummary>,
    totals: CaseTotals,
}

impl CaseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_total(&self) -> u32 {
        self.previous_total
    }

    pub fn ingest_month(
        &mut self,
        month: ReportMonth,
        report: &MonthlyReport,
    ) -> Result<&MonthlySummary, AppError> {
        let mut month_totals = CaseTotals::default();
        let mut last_date: Option<NaiveDate> = None;

        // Keys are sorted, so two timestamps on one day sit next to each other.
        for (key, counts) in &report.results {
            let date = parse_day_key(key)?;
            if last_date == Some(date) {
                return Err(AppError::Schema(format!(
                    "more than one result for {} in {}",
                    date, month
                )));
            }
            last_date = Some(date);

            month_totals.add(counts.students, counts.staff, counts.total);

            if counts.total == 0 {
                continue;
            }

            self.records.push(DailyCaseRecord::new(
                date,
                counts.students,
                counts.staff,
                counts.total,
                self.previous_total,
            ));
            self.previous_total = counts.total;
        }

        self.totals.merge(&month_totals);
        self.months.push(MonthlySummary {
            month,
            totals: month_totals,
        });

        Ok(&self.months[self.months.len() - 1])
    }

    pub fn finish(self) -> CaseReport {
        CaseReport {
            records: self.records,
            months: self.months,
            totals: self.totals,
        }
    }
}

/// The first ten characters of a result key are the calendar date.
pub fn parse_day_key(key: &str) -> Result<NaiveDate, AppError> {
    let day = key
        .get(..10)
        .ok_or_else(|| AppError::Schema(format!("result key too short: {:?}", key)))?;

    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| AppError::Schema(format!("result key {:?} is not a date: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::dto::DayCounts;

    fn report(days: &[(&str, u32, u32, u32)]) -> MonthlyReport {
        MonthlyReport {
            results: days
                .iter()
                .map(|(key, students, staff, total)| {
                    (
                        key.to_string(),
                        DayCounts { students: *students, staff: *staff, total: *total },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn zero_total_days_are_summed_but_not_emitted() {
        let mut acc = CaseAccumulator::new();
        let summary = acc
            .ingest_month(
                ReportMonth::new(2021, 9),
                &report(&[
                    ("2021-09-01T00:00:00", 3, 1, 4),
                    ("2021-09-02T00:00:00", 1, 0, 0),
                ]),
            )
            .unwrap()
            .clone();

        assert_eq!(summary.totals, CaseTotals { cases: 4, students: 4, staff: 1 });

        let report = acc.finish();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].percent_change, 1.0);
        assert_eq!(report.records[0].day_of_week, "Wednesday");
    }

    #[test]
    fn zero_day_does_not_move_previous_total() {
        let mut acc = CaseAccumulator::new();
        acc.ingest_month(
            ReportMonth::new(2021, 9),
            &report(&[
                ("2021-09-01T00:00:00", 2, 0, 2),
                ("2021-09-02T00:00:00", 0, 0, 0),
                ("2021-09-03T00:00:00", 3, 1, 4),
            ]),
        )
        .unwrap();

        assert_eq!(acc.previous_total(), 4);
        let report = acc.finish();
        assert_eq!(report.records[1].percent_change, 0.5);
    }

    #[test]
    fn two_timestamps_on_one_day_are_rejected() {
        let mut acc = CaseAccumulator::new();
        let err = acc
            .ingest_month(
                ReportMonth::new(2021, 9),
                &report(&[
                    ("2021-09-01T00:00:00", 1, 0, 1),
                    ("2021-09-01T12:00:00", 2, 0, 2),
                ]),
            )
            .unwrap_err();

        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn bad_keys_are_schema_errors() {
        assert!(matches!(parse_day_key("2021-09"), Err(AppError::Schema(_))));
        assert!(matches!(parse_day_key("not-a-date-at-all"), Err(AppError::Schema(_))));
        assert_eq!(
            parse_day_key("2021-08-10T00:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2021, 8, 10).unwrap()
        );
    }
}
