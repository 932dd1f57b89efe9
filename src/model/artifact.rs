//! Classifier Artifact - ONNX Runtime Integration
//!
//! Load và chạy classifier (ONNX export).
//! The binder only sees the [`RiskModel`] trait.

use std::path::Path;

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::error::{ArtifactLoadError, InferenceError};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One row handed to the classifier, columns in feature-order
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl ModelInput {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// (negative, positive) class probabilities, in the classifier's own f32
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub negative: f32,
    pub positive: f32,
}

impl ClassProbabilities {
    /// Positive class on the percent scale.
    ///
    /// Scaled in f32 before widening: 0.7f32 must land on 70.0, not 69.99999.
    pub fn positive_percent(&self) -> f64 {
        f64::from(self.positive * 100.0)
    }
}

// ============================================================================
// RISK MODEL TRAIT
// ============================================================================

/// Binary classifier producing class probabilities for one row
pub trait RiskModel: Send + Sync {
    fn predict_proba(&self, input: &ModelInput) -> Result<ClassProbabilities, InferenceError>;

    /// Human readable source, for status output
    fn describe(&self) -> String;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Output name written by onnxmltools for classifier probabilities
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxRiskModel {
    session: Mutex<Session>,
    output_name: String,
    source: String,
}

impl OnnxRiskModel {
    /// Load ONNX model từ file
    pub fn load(model_path: &Path) -> Result<Self, ArtifactLoadError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ArtifactLoadError::Missing(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ArtifactLoadError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactLoadError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ArtifactLoadError::Corrupt {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let output_name = select_probability_output(&output_names).ok_or_else(|| {
            ArtifactLoadError::Corrupt {
                path: model_path.to_path_buf(),
                reason: "model defines no outputs".to_string(),
            }
        })?;

        tracing::info!("ONNX model loaded successfully (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            source: model_path.display().to_string(),
        })
    }
}

impl RiskModel for OnnxRiskModel {
    fn predict_proba(&self, input: &ModelInput) -> Result<ClassProbabilities, InferenceError> {
        let row: Vec<f32> = input.values.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, row.len()), row)
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs.get(self.output_name.as_str())
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.output_name)))?;

        let output_tensor = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        probabilities_from_slice(output_tensor.1)
    }

    fn describe(&self) -> String {
        format!("ONNX Runtime (CPU): {}", self.source)
    }
}

/// Pick the probability tensor among a model's outputs
pub(crate) fn select_probability_output(names: &[String]) -> Option<String> {
    names.iter()
        .find(|n| n.as_str() == PROBABILITY_OUTPUT)
        .or_else(|| names.iter().find(|n| n.to_ascii_lowercase().contains("prob")))
        .or_else(|| names.last())
        .cloned()
}

/// Interpret the first row of a probability tensor.
///
/// `[neg, pos, ..]` is a two-class output; a single value is P(positive).
pub(crate) fn probabilities_from_slice(data: &[f32]) -> Result<ClassProbabilities, InferenceError> {
    let (negative, positive) = match data {
        [] => return Err(InferenceError("Empty probability output".to_string())),
        [p] => (1.0 - *p, *p),
        [neg, pos, ..] => (*neg, *pos),
    };
    Ok(ClassProbabilities { negative, positive })
}
