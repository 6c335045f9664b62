use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::models::DailyCaseRecord;

const HEADER: [&str; 6] = ["date", "students", "staff", "total", "percent_change", "day_of_week"];
const REQUIRED_COLUMNS: [&str; 5] = ["date", "students", "staff", "total", "day_of_week"];
const PERCENT_COLUMNS: [&str; 2] = ["percent_change", "perc_diff"];

/// Reads a previously saved record table. `Ok(None)` when there is no file.
pub fn load_cache(path: &Path) -> Result<Option<Vec<DailyCaseRecord>>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !PERCENT_COLUMNS.iter().any(|column| headers.iter().any(|h| h == *column)) {
        missing.push(PERCENT_COLUMNS[0].to_string());
    }
    if !missing.is_empty() {
        return Err(AppError::CacheColumns(missing));
    }

    // `perc_diff` is only a fallback name; with both present it would
    // collide with `percent_change` during deserialization.
    if headers.iter().any(|h| h == PERCENT_COLUMNS[0]) {
        let renamed: csv::StringRecord = headers
            .iter()
            .map(|h| if h == PERCENT_COLUMNS[1] { "_perc_diff" } else { h })
            .collect();
        reader.set_headers(renamed);
    }

    let records = reader
        .deserialize::<DailyCaseRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} records from cache {}", records.len(), path.display());
    Ok(Some(records))
}

pub fn write_cache(path: &Path, records: &[DailyCaseRecord]) -> Result<(), AppError> {
    // Header written by hand so an empty table still round-trips.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Wrote {} records to cache {}", records.len(), path.display());
    Ok(())
}
