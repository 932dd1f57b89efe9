//! Feature Spec - how one model input is presented and encoded

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Range used for any feature the schema does not list
pub const FALLBACK_RANGE: NumericRange = NumericRange {
    min: 0.0,
    max: 100.0,
    default: 0.0,
    step: 1.0,
};

/// One (label, code) pair of a categorical feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    /// Shown to the user, escaped by the renderer
    pub label: String,
    /// Value the model expects
    pub code: f64,
}

impl CategoryOption {
    pub fn new(label: impl Into<String>, code: f64) -> Self {
        Self { label: label.into(), code }
    }
}

/// Bounded numeric control settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self { min, max, default, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Clamp, then move to the nearest `min + k * step` inside the range.
    ///
    /// The result is rounded to the step's decimals so 0.1 steps read as
    /// 25.3, the same value a range input reports.
    pub fn snap(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.step_decimals());
        let on_grid = |k: f64| ((self.min + k * self.step) * scale).round() / scale;

        let k = ((self.clamp(value) - self.min) / self.step).round();
        let snapped = on_grid(k);
        if snapped > self.max {
            on_grid(k - 1.0)
        } else {
            snapped
        }
    }

    fn step_decimals(&self) -> i32 {
        (0..10)
            .find(|&d| {
                let scaled = self.step * 10f64.powi(d);
                (scaled - scaled.round()).abs() < 1e-9
            })
            .unwrap_or(10)
    }

    fn validate(&self, feature: &str) -> Result<(), SchemaError> {
        let values = [self.min, self.max, self.default, self.step];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SchemaError::NonFinite(feature.to_string()));
        }
        if !(self.min <= self.default && self.default <= self.max) {
            return Err(SchemaError::DefaultOutOfRange(feature.to_string()));
        }
        if self.step <= 0.0 {
            return Err(SchemaError::NonPositiveStep(feature.to_string()));
        }
        Ok(())
    }
}

/// Presentation and encoding of one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// Single choice over an ordered option list
    Categorical { options: Vec<CategoryOption> },
    /// Bounded slider
    Continuous(NumericRange),
}

impl FeatureSpec {
    pub fn categorical<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        FeatureSpec::Categorical {
            options: options
                .into_iter()
                .map(|(label, code)| CategoryOption::new(label, code))
                .collect(),
        }
    }

    pub const fn continuous(min: f64, max: f64, default: f64, step: f64) -> Self {
        FeatureSpec::Continuous(NumericRange::new(min, max, default, step))
    }

    pub const fn fallback() -> Self {
        FeatureSpec::Continuous(FALLBACK_RANGE)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeatureSpec::Categorical { .. } => "categorical",
            FeatureSpec::Continuous(_) => "continuous",
        }
    }

    /// Value used before any user interaction
    pub fn default_value(&self) -> f64 {
        match self {
            FeatureSpec::Categorical { options } => options.first().map(|o| o.code).unwrap_or(0.0),
            FeatureSpec::Continuous(range) => range.default,
        }
    }

    /// Map a user-supplied value onto the spec.
    ///
    /// Categorical values must be a declared code; continuous values are
    /// clamped into range and snapped to the step grid. Returns `None` when
    /// the value cannot be accepted.
    pub fn coerce(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            FeatureSpec::Categorical { options } => {
                options.iter().find(|o| o.code == value).map(|o| o.code)
            }
            FeatureSpec::Continuous(range) => Some(range.snap(value)),
        }
    }

    /// Whether `value` is a legal encoded value for this spec
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            FeatureSpec::Categorical { options } => options.iter().any(|o| o.code == value),
            FeatureSpec::Continuous(range) => range.contains(value),
        }
    }

    pub fn validate(&self, feature: &str) -> Result<(), SchemaError> {
        match self {
            FeatureSpec::Categorical { options } => {
                if options.is_empty() {
                    return Err(SchemaError::NoOptions(feature.to_string()));
                }
                for (i, option) in options.iter().enumerate() {
                    if !option.code.is_finite() {
                        return Err(SchemaError::NonFinite(feature.to_string()));
                    }
                    let earlier = &options[..i];
                    if earlier.iter().any(|o| o.label == option.label) {
                        return Err(SchemaError::DuplicateLabel {
                            feature: feature.to_string(),
                            label: option.label.clone(),
                        });
                    }
                    if earlier.iter().any(|o| o.code == option.code) {
                        return Err(SchemaError::DuplicateCode {
                            feature: feature.to_string(),
                            code: option.code,
                        });
                    }
                }
                Ok(())
            }
            FeatureSpec::Continuous(range) => range.validate(feature),
        }
    }
}
