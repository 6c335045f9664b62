pub mod case;
pub mod summary;

pub use case::DailyCaseRecord;
pub use summary::{
    CaseReport, CaseTotals, DashboardSummary, MonthlyCases, MonthlySummary, RollingPoint,
    WeeklyCases,
};
