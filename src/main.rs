use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use stockvision_backend::app;
use stockvision_backend::config::{ClientConfig, ServerConfig};
use stockvision_backend::external::stockvision::StockVisionClient;
use stockvision_backend::logging::{init_logging, LoggingConfig};
use stockvision_backend::services::prediction_service::PredictionOrchestrator;
use stockvision_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let client_config = ClientConfig::from_env().context("invalid STOCKVISION_API_URL")?;
    let server_config = ServerConfig::from_env();

    tracing::info!(
        "Using StockVision data service at {} (timeout {}s)",
        client_config.base_url,
        client_config.timeout_secs
    );
    let client = StockVisionClient::new(&client_config).context("failed to build HTTP client")?;

    let state = AppState {
        orchestrator: Arc::new(PredictionOrchestrator::new(Arc::new(client))),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&server_config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.bind_addr))?;
    tracing::info!("StockVision backend running at http://{}/", server_config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
