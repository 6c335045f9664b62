use std::sync::Arc;

use chrono::Local;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use case_dashboard::api::router;
use case_dashboard::config::AppConfig;
use case_dashboard::report::ReportHttpClient;
use case_dashboard::services::CaseService;
use case_dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "case_dashboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let client = Arc::new(ReportHttpClient::new(config.report.clone())?);
    let service = Arc::new(CaseService::new(client, config.window, config.cache_path.clone()));

    let records = service.load(Local::now().date_naive()).await?;
    info!("Serving {} reported days", records.len());

    let state = AppState::new(service, records);
    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
