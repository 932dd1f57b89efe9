//! Error handling

use std::path::PathBuf;

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

// ============================================================================
// DOMAIN ERRORS
// ============================================================================

/// Failure to load the classifier or the feature-order artifact
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt artifact {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("feature order is empty")]
    EmptyOrder,

    #[error("duplicate feature in order: {0}")]
    DuplicateFeature(String),

    #[error("model runtime error: {0}")]
    Runtime(String),
}

/// Prediction call failed for a populated record
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct InferenceError(pub String);

/// Invalid feature schema entry
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("feature {0}: categorical spec has no options")]
    NoOptions(String),

    #[error("feature {feature}: duplicate option label {label:?}")]
    DuplicateLabel { feature: String, label: String },

    #[error("feature {feature}: duplicate option code {code}")]
    DuplicateCode { feature: String, code: f64 },

    #[error("feature {0}: range requires min <= default <= max")]
    DefaultOutOfRange(String),

    #[error("feature {0}: step must be positive")]
    NonPositiveStep(String),

    #[error("feature {0}: values must be finite")]
    NonFinite(String),

    #[error("feature {0} declared twice")]
    DuplicateFeature(String),

    #[error("failed to read schema file: {0}")]
    Read(String),
}

/// Rejected sticky-value edit
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditError {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("value {value} is not valid for feature {feature}")]
    Rejected { feature: String, value: f64 },

    #[error("value for feature {feature} is not a number: {raw:?}")]
    NotANumber { feature: String, raw: String },
}

// ============================================================================
// HTTP ERRORS
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    // Model errors
    ModelUnavailable(String),
    InferenceFailed(InferenceError),

    // Validation errors
    ValidationError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ModelUnavailable(reason) => {
                tracing::warn!("Request rejected, model unavailable: {}", reason);
                (StatusCode::SERVICE_UNAVAILABLE, "Model unavailable".to_string())
            }
            AppError::InferenceFailed(err) => {
                tracing::error!("Inference error: {}", err);
                (StatusCode::UNPROCESSABLE_ENTITY, format!("Prediction Error: {}", err))
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::InferenceFailed(err)
    }
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
