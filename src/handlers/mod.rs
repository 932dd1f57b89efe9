//! HTTP handlers

use std::sync::Arc;

use crate::binder::{predict, InputRecord, PredictionResult};
use crate::error::InferenceError;
use crate::model::LoadedModel;

pub mod health;
pub mod page;
pub mod api;

#[cfg(test)]
mod tests;

/// Run the classifier on the blocking pool
pub(crate) async fn predict_off_runtime(
    loaded: Arc<LoadedModel>,
    record: InputRecord,
) -> Result<PredictionResult, InferenceError> {
    tokio::task::spawn_blocking(move || predict(&record, &loaded.order, loaded.model.as_ref()))
        .await
        .unwrap_or_else(|e| Err(InferenceError(format!("Prediction task failed: {}", e))))
}
