use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use case_dashboard::config::{ReportConfig, ReportMonth};
use case_dashboard::error::AppError;
use case_dashboard::report::{REPORT_PATH, ReportClient, ReportHttpClient};

const SEPTEMBER: &[u8] = b"\xEF\xBB\xBF{\"Results\":{\"2021-09-01T00:00:00\":{\"StudentPositiveCount\":3,\"StaffPositiveCount\":1,\"Total\":4}}}";

async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server failed");
    });
    format!("http://{}", addr)
}

fn client(base_url: String, max_retries: u32) -> ReportHttpClient {
    let mut config = ReportConfig::new(base_url);
    config.max_retries = max_retries;
    config.retry_delay = Duration::from_millis(10);
    config.timeout = Duration::from_secs(5);
    ReportHttpClient::new(config).expect("Failed to create client")
}

async fn september_only(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Vec<u8>) {
    let is_september = params.get("rc").map(String::as_str) == Some("")
        && params.get("month").map(String::as_str) == Some("09")
        && params.get("year").map(String::as_str) == Some("2021");

    if is_september {
        (StatusCode::OK, SEPTEMBER.to_vec())
    } else {
        (StatusCode::NOT_FOUND, Vec::new())
    }
}

#[tokio::test]
async fn fetches_month_with_byte_order_mark() {
    let base = spawn_stub(Router::new().route(REPORT_PATH, get(september_only))).await;
    let client = client(base, 0);

    let report = client.fetch_month(ReportMonth::new(2021, 9)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let day = &report.results["2021-09-01T00:00:00"];
    assert_eq!((day.students, day.staff, day.total), (3, 1, 4));
}

#[tokio::test]
async fn non_success_status_is_surfaced() {
    let base = spawn_stub(Router::new().route(REPORT_PATH, get(september_only))).await;
    let client = client(base, 2);

    let err = client.fetch_month(ReportMonth::new(2021, 10)).await.unwrap_err();

    match err {
        AppError::Status { status, url } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(url.ends_with("?rc=&month=10&year=2021"), "{}", url);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn month_url_is_zero_padded() {
    let client = client("https://example.test/".to_string(), 0);
    assert_eq!(
        client.month_url(ReportMonth::new(2022, 1)),
        "https://example.test/api/sitdash/dashboard/publicreport?rc=&month=01&year=2022"
    );
}

async fn flaky(State(hits): State<Arc<AtomicUsize>>) -> (StatusCode, Vec<u8>) {
    if hits.fetch_add(1, Ordering::SeqCst) < 2 {
        (StatusCode::SERVICE_UNAVAILABLE, Vec::new())
    } else {
        (StatusCode::OK, SEPTEMBER.to_vec())
    }
}

fn flaky_router(hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(REPORT_PATH, get(flaky)).with_state(hits)
}

#[tokio::test]
async fn server_errors_are_retried_when_enabled() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_stub(flaky_router(hits.clone())).await;
    let client = client(base, 2);

    let report = client.fetch_month(ReportMonth::new(2021, 9)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn no_retries_by_default() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_stub(flaky_router(hits.clone())).await;
    let client = client(base, 0);

    let err = client.fetch_month(ReportMonth::new(2021, 9)).await.unwrap_err();

    assert!(matches!(err, AppError::Status { .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn html_body_is_a_decode_error() {
    let router = Router::new().route(
        REPORT_PATH,
        get(|| async { (StatusCode::OK, "<html>maintenance</html>") }),
    );
    let base = spawn_stub(router).await;
    let client = client(base, 0);

    let err = client.fetch_month(ReportMonth::new(2021, 9)).await.unwrap_err();

    assert!(matches!(err, AppError::Decode(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client(format!("http://{}", addr), 0);

    let err = client.fetch_month(ReportMonth::new(2021, 9)).await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert!(err.is_retryable());
}
