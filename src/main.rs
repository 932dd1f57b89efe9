//! IIH Risk Calculator server binary

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iih_risk::{
    config::Config,
    create_router,
    model::ModelCell,
    schema::Schema,
    session::SessionStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "iih_risk=debug,tower_http=debug".into());
    if config.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("IIH Risk Calculator starting ({})...", config.environment);
    tracing::info!("Model: {}", config.model_path.display());
    tracing::info!("Feature names: {}", config.feature_names_path.display());

    let schema = match &config.schema_path {
        Some(path) => {
            tracing::info!("Loading feature schema from {}", path.display());
            Schema::load(path).context("Failed to load feature schema")?
        }
        None => Schema::builtin(),
    };
    if schema.is_empty() {
        tracing::warn!("Feature schema is empty; every input uses the fallback range");
    } else {
        tracing::info!("Feature schema: {} entries", schema.len());
    }

    // Build application state
    let state = AppState {
        model: Arc::new(ModelCell::from_paths(
            config.model_path.clone(),
            config.feature_names_path.clone(),
        )),
        schema: Arc::new(schema),
        sessions: Arc::new(SessionStore::new(Duration::from_secs(config.session_idle_minutes * 60))),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
