//! PharmScope — pharmaceutical market-research orchestration server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use pharmscope_llm::{AnthropicClient, ModelClient};
use pharmscope_server::routes;
use pharmscope_server::state::AppState;
use pharmscope_store::DocumentStore;
use pharmscope_trials::TrialsClient;

fn resolve_data_dir() -> PathBuf {
    std::env::var("PHARMSCOPE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = pharmscope_core::PharmScopeConfig::from_env(&data_dir)?;
    let port = config.port;

    let store = DocumentStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    let model: Arc<dyn ModelClient> = Arc::new(AnthropicClient::new());
    let trials = TrialsClient::new();

    let state = Arc::new(AppState::new(config, store, model, trials));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("PharmScope server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
