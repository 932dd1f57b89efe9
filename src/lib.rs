//! IIH Risk Calculator
//!
//! Web calculator for inadvertent intraoperative hypothermia risk.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     IIH RISK CALCULATOR                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │  Router   │  │  Form-Schema     │  │  Model Cell      │ │
//! │  │  (Axum)   │─▶│  Binder          │─▶│  (ONNX, once)    │ │
//! │  └─────┬─────┘  └────────┬─────────┘  └──────────────────┘ │
//! │        ▼                 ▼                                  │
//! │  ┌───────────┐  ┌──────────────────┐                       │
//! │  │ Sessions  │  │  HTML + Gauge    │                       │
//! │  │ (sticky)  │  │  Renderer        │                       │
//! │  └───────────┘  └──────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod render;
pub mod schema;
pub mod session;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use model::ModelCell;
use schema::Schema;
use session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelCell>,
    pub schema: Arc<Schema>,
    pub sessions: Arc<SessionStore>,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Stateless routes
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/schema", get(handlers::api::schema))
        .route("/api/v1/predict", post(handlers::api::predict));

    // Routes bound to the caller's session (sticky inputs)
    let session_routes = Router::new()
        .route("/", get(handlers::page::index))
        .route("/calculate", post(handlers::page::calculate))
        .route("/api/v1/session/inputs", post(handlers::api::session_input))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::attach_session
        ));

    let cors = if state.config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
