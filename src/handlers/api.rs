//! JSON API handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{AppState, AppError, AppResult};
use crate::binder::{apply_edit, render_inputs, validate_edit, RecordField, StickyValues};
use crate::handlers::predict_off_runtime;
use crate::middleware::session::SessionContext;
use crate::model::{LoadedModel, ModelState, RiskTier};
use crate::render::gauge::bar_color;
use crate::schema::FeatureSpec;

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// One sticky-value edit from the page
#[derive(Debug, Deserialize, Validate)]
pub struct InputEdit {
    #[validate(length(min = 1, max = 128))]
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    /// Missing features take their defaults
    #[serde(default)]
    pub values: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probability: f64,
    pub percent: f64,
    pub tier: RiskTier,
    pub label: &'static str,
    pub message: String,
    pub gauge_color: &'static str,
    pub record: Vec<RecordField>,
}

#[derive(Debug, Serialize)]
pub struct FeatureView {
    pub name: String,
    pub column: usize,
    pub fallback: bool,
    #[serde(flatten)]
    pub spec: FeatureSpec,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub features: Vec<FeatureView>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Resolved specs in model feature order
pub async fn schema(State(state): State<AppState>) -> AppResult<Json<SchemaResponse>> {
    let loaded = require_model(&state).await?;

    let features = loaded
        .order
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let resolved = state.schema.resolve(name);
            FeatureView {
                name: name.to_string(),
                column: index % crate::binder::COLUMN_COUNT,
                fallback: resolved.fallback,
                spec: resolved.spec.into_owned(),
            }
        })
        .collect();

    Ok(Json(SchemaResponse { features }))
}

/// Record a single edit into the caller's session
pub async fn session_input(
    State(state): State<AppState>,
    session: SessionContext,
    Json(req): Json<InputEdit>,
) -> AppResult<StatusCode> {
    req.validate()?;
    let loaded = require_model(&state).await?;

    let stored = validate_edit(&loaded.order, &state.schema, &req.feature, req.value)?;
    state.sessions.with_session(session.id, |s| {
        s.sticky.insert(req.feature.clone(), stored);
    });

    tracing::debug!("Session {}: {} = {}", session.id, req.feature, stored);
    Ok(StatusCode::NO_CONTENT)
}

/// Stateless prediction for API clients
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    let loaded = require_model(&state).await?;

    let mut values = StickyValues::new();
    for (feature, value) in &req.values {
        apply_edit(&loaded.order, &state.schema, &mut values, feature, *value)?;
    }

    let form = render_inputs(&loaded.order, &state.schema, &values);
    let result = predict_off_runtime(loaded.clone(), form.record.clone()).await?;

    Ok(Json(PredictResponse {
        probability: result.probability,
        percent: result.percent,
        tier: result.tier,
        label: result.tier.label(),
        message: result.message(),
        gauge_color: bar_color(result.percent),
        record: form.record.ordered_fields(&loaded.order),
    }))
}

async fn require_model(state: &AppState) -> AppResult<Arc<LoadedModel>> {
    match state.model.ready().await {
        ModelState::Available(loaded) => Ok(loaded.clone()),
        ModelState::Unavailable { reason } => Err(AppError::ModelUnavailable(reason.clone())),
    }
}
