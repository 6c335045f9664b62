use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::AppError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Body of `publicreport` for a single month.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyReport {
    /// Keyed by a `YYYY-MM-DDTHH:MM:SS` timestamp. Ordered map so entries
    /// are visited chronologically.
    #[serde(rename = "Results")]
    pub results: BTreeMap<String, DayCounts>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DayCounts {
    #[serde(rename = "StudentPositiveCount")]
    pub students: u32,
    #[serde(rename = "StaffPositiveCount")]
    pub staff: u32,
    #[serde(rename = "Total")]
    pub total: u32,
}

/// Strips an optional UTF-8 byte-order mark and validates the rest.
pub fn decode_body(bytes: &[u8]) -> Result<&str, AppError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map_err(|e| AppError::Decode(format!("response body is not UTF-8: {}", e)))
}

/// Two stages so malformed JSON and a wrong shape surface as different errors.
pub fn parse_monthly_report(bytes: &[u8]) -> Result<MonthlyReport, AppError> {
    let text = decode_body(bytes)?;
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| AppError::Decode(format!("response body is not JSON: {}", e)))?;

    serde_json::from_value(value)
        .map_err(|e| AppError::Schema(format!("unexpected report shape: {}", e)))
}
