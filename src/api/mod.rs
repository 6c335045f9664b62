use axum::Json;
use axum::extract::Query;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::models::*;
use crate::services::dashboard;
use crate::state::AppState;

const DEFAULT_TREND_WINDOW: usize = 7;

#[derive(Deserialize)]
struct CasesQueryParams {
    /// Comma-separated weekday names.
    #[serde(default)]
    days: Option<String>,
}

#[derive(Deserialize)]
struct TrendQueryParams {
    #[serde(default)]
    window: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub days_reported: usize,
    pub months: Vec<MonthlySummary>,
    pub totals: CaseTotals,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cases", get(list_cases))
        .route("/weekdays", get(list_weekdays))
        .route("/summary", get(summary))
        .route("/summary/monthly", get(monthly_summary))
        .route("/summary/weekly", get(weekly_summary))
        .route("/trend", get(trend))
        .route("/refresh", post(refresh))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<CasesQueryParams>,
) -> Result<Json<Vec<DailyCaseRecord>>, AppError> {
    let records = state.records.read().await;
    let cases = match params.days.as_deref() {
        Some(days) => {
            let days = dashboard::parse_weekdays(days)?;
            dashboard::filter_by_weekdays(&records, &days)
        }
        None => records.clone(),
    };
    Ok(Json(cases))
}

async fn list_weekdays(State(state): State<AppState>) -> Json<Vec<String>> {
    let records = state.records.read().await;
    Json(dashboard::weekday_options(&records))
}

async fn summary(State(state): State<AppState>) -> Json<DashboardSummary> {
    let records = state.records.read().await;
    Json(dashboard::summarize(&records, Local::now().date_naive()))
}

async fn monthly_summary(State(state): State<AppState>) -> Json<Vec<MonthlyCases>> {
    let records = state.records.read().await;
    Json(dashboard::monthly_cases(&records))
}

async fn weekly_summary(State(state): State<AppState>) -> Json<Vec<WeeklyCases>> {
    let records = state.records.read().await;
    Json(dashboard::weekly_cases(&records))
}

async fn trend(
    State(state): State<AppState>,
    Query(params): Query<TrendQueryParams>,
) -> Result<Json<Vec<RollingPoint>>, AppError> {
    let window = params.window.unwrap_or(DEFAULT_TREND_WINDOW);
    if window == 0 {
        return Err(AppError::BadRequest("window must be at least 1".to_string()));
    }

    let records = state.records.read().await;
    Ok(Json(dashboard::rolling_average(&records, window)))
}

async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let report = state.service.refresh(Local::now().date_naive()).await?;

    let response = RefreshResponse {
        days_reported: report.records.len(),
        months: report.months,
        totals: report.totals,
    };
    *state.records.write().await = report.records;
    info!("Refreshed dataset: {} reported days", response.days_reported);

    Ok(Json(response))
}
