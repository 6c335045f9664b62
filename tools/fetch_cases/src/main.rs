use std::sync::Arc;

use case_dashboard::config::AppConfig;
use case_dashboard::report::ReportHttpClient;
use case_dashboard::services::{CaseFetcher, cache};
use chrono::Local;
use dotenvy::dotenv;

fn is_dry_run() -> bool {
    !std::env::args().any(|a| a == "--write")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    let client = Arc::new(ReportHttpClient::new(config.report.clone())?);
    let fetcher = CaseFetcher::new(client, config.window);

    let report = fetcher.fetch_all(Local::now().date_naive()).await?;

    for month in &report.months {
        println!(
            "{}: {} cases ({} students, {} staff)",
            month.month, month.totals.cases, month.totals.students, month.totals.staff
        );
    }

    println!(
        "School year: {} cases ({} students, {} staff) over {} reported days",
        report.totals.cases,
        report.totals.students,
        report.totals.staff,
        report.records.len()
    );

    let Some(path) = config.cache_path.as_deref() else {
        println!("CASES_CACHE_PATH is empty, nothing to write");
        return Ok(());
    };

    if is_dry_run() {
        println!(
            "[DRY RUN] Would write {} records to {}",
            report.records.len(),
            path.display()
        );
    } else {
        cache::write_cache(path, &report.records)?;
        println!("Wrote {} records to {}", report.records.len(), path.display());
    }

    Ok(())
}
