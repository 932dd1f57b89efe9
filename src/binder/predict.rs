//! Prediction - record -> classifier -> tier

use serde::Serialize;

use super::record::InputRecord;
use crate::error::InferenceError;
use crate::model::{ClassProbabilities, FeatureOrder, RiskModel, RiskTier};

/// Outcome of one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Positive-class probability, 0.0 - 1.0
    pub probability: f64,
    /// Same value on the 0 - 100 scale; the tier is bucketed on this
    pub percent: f64,
    pub tier: RiskTier,
}

impl PredictionResult {
    pub fn from_probability(probability: f64) -> Self {
        let percent = probability * 100.0;
        Self { probability, percent, tier: RiskTier::from_percent(percent) }
    }

    /// Build from classifier output, keeping its f32 scaling for the tier
    pub fn from_class_probabilities(probabilities: &ClassProbabilities) -> Self {
        let percent = probabilities.positive_percent();
        Self {
            probability: f64::from(probabilities.positive),
            percent,
            tier: RiskTier::from_percent(percent),
        }
    }

    /// Percent with one decimal, e.g. "42.0%"
    pub fn display_percent(&self) -> String {
        format!("{:.1}%", self.percent)
    }

    /// e.g. "Medium Risk: 42.0%"
    pub fn message(&self) -> String {
        format!("{}: {}", self.tier.label(), self.display_percent())
    }
}

/// Run the classifier on `record`, columns in `order`.
///
/// The classifier does not check column names, so `order` is the only
/// thing standing between a record and a silently wrong answer.
pub fn predict(
    record: &InputRecord,
    order: &FeatureOrder,
    model: &dyn RiskModel,
) -> Result<PredictionResult, InferenceError> {
    let input = record.to_model_input(order)?;
    let probabilities = model.predict_proba(&input)?;

    let probability = probabilities.positive;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(InferenceError(format!(
            "Positive-class probability out of range: {}",
            probability
        )));
    }

    Ok(PredictionResult::from_class_probabilities(&probabilities))
}

/// Result region of the page
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    /// No calculation yet
    Idle,
    Displayed(PredictionResult),
    /// Last calculation failed; the previous result stays visible
    Failed {
        message: String,
        previous: Option<PredictionResult>,
    },
}

impl ResultPanel {
    /// Panel for a page that has not just calculated
    pub fn resting(last: Option<PredictionResult>) -> Self {
        match last {
            Some(result) => ResultPanel::Displayed(result),
            None => ResultPanel::Idle,
        }
    }

    /// Panel after a calculation attempt
    pub fn after(outcome: &Result<PredictionResult, InferenceError>, previous: Option<PredictionResult>) -> Self {
        match outcome {
            Ok(result) => ResultPanel::Displayed(*result),
            Err(e) => ResultPanel::Failed {
                message: format!("Prediction Error: {}", e),
                previous,
            },
        }
    }
}
