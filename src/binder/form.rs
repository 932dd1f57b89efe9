//! Form rendering - FeatureOrder + Schema -> widgets + record

use std::collections::HashMap;

use serde::Serialize;

use super::record::InputRecord;
use crate::error::EditError;
use crate::model::FeatureOrder;
use crate::schema::{FeatureSpec, Schema};

/// Number of parallel input columns
pub const COLUMN_COUNT: usize = 2;

/// Last value per feature within one session
pub type StickyValues = HashMap<String, f64>;

/// One choice of a radio group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadioChoice {
    pub label: String,
    pub code: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Radio { choices: Vec<RadioChoice> },
    Slider { min: f64, max: f64, step: f64, value: f64 },
}

impl Control {
    /// Encoded value the control currently carries
    pub fn value(&self) -> f64 {
        match self {
            Control::Radio { choices } => choices
                .iter()
                .find(|c| c.selected)
                .or_else(|| choices.first())
                .map(|c| c.code)
                .unwrap_or(0.0),
            Control::Slider { value, .. } => *value,
        }
    }
}

/// An input control placed in the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub feature: String,
    pub column: usize,
    pub control: Control,
    /// Rendered from the generic fallback range
    pub fallback: bool,
}

/// Widgets in feature order plus the record they carry
#[derive(Debug, Clone)]
pub struct RenderedForm {
    pub widgets: Vec<Widget>,
    pub record: InputRecord,
}

impl RenderedForm {
    /// Widgets grouped by column, each column top to bottom
    pub fn columns(&self) -> Vec<Vec<&Widget>> {
        let mut columns: Vec<Vec<&Widget>> = vec![Vec::new(); COLUMN_COUNT];
        for widget in &self.widgets {
            columns[widget.column].push(widget);
        }
        columns
    }
}

/// Render one widget per feature in `order` and collect the live record.
///
/// Sticky values that no longer fit the spec are ignored (categorical)
/// or clamped onto the step grid (continuous).
pub fn render_inputs(order: &FeatureOrder, schema: &Schema, sticky: &StickyValues) -> RenderedForm {
    let mut widgets = Vec::with_capacity(order.len());
    let mut record = InputRecord::new();

    for (index, feature) in order.iter().enumerate() {
        let resolved = schema.resolve(feature);
        let control = build_control(&resolved.spec, sticky.get(feature).copied());

        record.insert(feature, control.value());
        widgets.push(Widget {
            feature: feature.to_string(),
            column: index % COLUMN_COUNT,
            control,
            fallback: resolved.fallback,
        });
    }

    RenderedForm { widgets, record }
}

fn build_control(spec: &FeatureSpec, sticky: Option<f64>) -> Control {
    let current = sticky.and_then(|v| spec.coerce(v)).unwrap_or_else(|| spec.default_value());

    match spec {
        FeatureSpec::Categorical { options } => {
            let selected = options
                .iter()
                .position(|o| o.code == current)
                .unwrap_or(0);
            Control::Radio {
                choices: options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| RadioChoice {
                        label: o.label.clone(),
                        code: o.code,
                        selected: i == selected,
                    })
                    .collect(),
            }
        }
        FeatureSpec::Continuous(range) => Control::Slider {
            min: range.min,
            max: range.max,
            step: range.step,
            value: current,
        },
    }
}

/// Check one user edit and return the value that would be stored
pub fn validate_edit(
    order: &FeatureOrder,
    schema: &Schema,
    feature: &str,
    value: f64,
) -> Result<f64, EditError> {
    if order.position(feature).is_none() {
        return Err(EditError::UnknownFeature(feature.to_string()));
    }

    let resolved = schema.resolve(feature);
    resolved.spec.coerce(value).ok_or_else(|| EditError::Rejected {
        feature: feature.to_string(),
        value,
    })
}

/// Record one user edit into the session's sticky values.
///
/// Returns the value actually stored.
pub fn apply_edit(
    order: &FeatureOrder,
    schema: &Schema,
    sticky: &mut StickyValues,
    feature: &str,
    value: f64,
) -> Result<f64, EditError> {
    let stored = validate_edit(order, schema, feature, value)?;
    sticky.insert(feature.to_string(), stored);
    Ok(stored)
}

/// [`apply_edit`] for a raw form field
pub fn apply_raw_edit(
    order: &FeatureOrder,
    schema: &Schema,
    sticky: &mut StickyValues,
    feature: &str,
    raw: &str,
) -> Result<f64, EditError> {
    let value: f64 = raw.trim().parse().map_err(|_| EditError::NotANumber {
        feature: feature.to_string(),
        raw: raw.to_string(),
    })?;
    apply_edit(order, schema, sticky, feature, value)
}
