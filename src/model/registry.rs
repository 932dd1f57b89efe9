//! Model Registry - load-once artifact cell
//!
//! Both artifacts load together, at most once per cell, on first access.
//! A failed load is cached as [`ModelState::Unavailable`] and never retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;

use super::artifact::{OnnxRiskModel, RiskModel};
use super::order::FeatureOrder;
use crate::error::ArtifactLoadError;

/// Classifier plus the feature order it was trained on
pub struct LoadedModel {
    pub order: FeatureOrder,
    pub model: Box<dyn RiskModel>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    pub fn new(order: FeatureOrder, model: Box<dyn RiskModel>) -> Self {
        Self { order, model, loaded_at: Utc::now() }
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("order", &self.order)
            .field("model", &self.model.describe())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Result of the one load attempt
#[derive(Debug, Clone)]
pub enum ModelState {
    Available(Arc<LoadedModel>),
    Unavailable { reason: String },
}

impl ModelState {
    pub fn available(&self) -> Option<&Arc<LoadedModel>> {
        match self {
            ModelState::Available(loaded) => Some(loaded),
            ModelState::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ModelState::Available(_))
    }
}

impl From<Result<LoadedModel, ArtifactLoadError>> for ModelState {
    fn from(result: Result<LoadedModel, ArtifactLoadError>) -> Self {
        match result {
            Ok(loaded) => ModelState::Available(Arc::new(loaded)),
            Err(e) => ModelState::Unavailable { reason: e.to_string() },
        }
    }
}

/// Engine status for health output
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub feature_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub unavailable_reason: Option<String>,
}

type Loader = Box<dyn Fn() -> Result<LoadedModel, ArtifactLoadError> + Send + Sync>;

/// Lazily initialized artifact holder
pub struct ModelCell {
    state: OnceCell<ModelState>,
    loader: Loader,
}

impl ModelCell {
    /// Cell that loads the ONNX classifier and JSON feature order on first use
    pub fn from_paths(model_path: PathBuf, feature_names_path: PathBuf) -> Self {
        Self::with_loader(move || load_artifacts(&model_path, &feature_names_path))
    }

    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<LoadedModel, ArtifactLoadError> + Send + Sync + 'static,
    {
        Self {
            state: OnceCell::new(),
            loader: Box::new(loader),
        }
    }

    /// Cell whose load already happened
    pub fn preloaded(state: ModelState) -> Self {
        Self {
            state: OnceCell::with_value(state),
            loader: Box::new(|| Err(ArtifactLoadError::Runtime("cell was preloaded".to_string()))),
        }
    }

    /// Current state, loading on first call.
    ///
    /// Concurrent first callers block on the same initialization.
    pub fn state(&self) -> &ModelState {
        self.state.get_or_init(|| {
            let state = ModelState::from((self.loader)());
            match &state {
                ModelState::Available(loaded) => tracing::info!(
                    "Model ready: {} ({} features)",
                    loaded.model.describe(),
                    loaded.order.len()
                ),
                ModelState::Unavailable { reason } => {
                    tracing::error!("Model unavailable, entering degraded mode: {}", reason)
                }
            }
            state
        })
    }

    /// [`state`](Self::state) for async callers.
    ///
    /// The first load runs on the blocking pool so artifact IO and session
    /// construction never stall a runtime worker.
    pub async fn ready(self: &Arc<Self>) -> &ModelState {
        if !self.is_initialized() {
            let cell = Arc::clone(self);
            if let Err(e) = tokio::task::spawn_blocking(move || {
                cell.state();
            })
            .await
            {
                tracing::error!("Model load task failed: {}", e);
            }
        }
        self.state()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn status(&self) -> EngineStatus {
        match self.state() {
            ModelState::Available(loaded) => EngineStatus {
                model_loaded: true,
                model_name: loaded.model.describe(),
                feature_count: loaded.order.len(),
                loaded_at: Some(loaded.loaded_at),
                unavailable_reason: None,
            },
            ModelState::Unavailable { reason } => EngineStatus {
                model_loaded: false,
                model_name: "None".to_string(),
                feature_count: 0,
                loaded_at: None,
                unavailable_reason: Some(reason.clone()),
            },
        }
    }
}

/// Load feature order then classifier; either failure fails the pair
pub fn load_artifacts(model_path: &Path, feature_names_path: &Path) -> Result<LoadedModel, ArtifactLoadError> {
    let order = FeatureOrder::load(feature_names_path)?;
    let model = OnnxRiskModel::load(model_path)?;
    Ok(LoadedModel::new(order, Box::new(model)))
}
