//! Input Record - current encoded value per feature

use std::collections::HashMap;

use serde::Serialize;

use crate::error::InferenceError;
use crate::model::{FeatureOrder, ModelInput};

/// Feature name -> encoded value, rebuilt on every render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRecord {
    values: HashMap<String, f64>,
}

/// One (feature, value) pair in model column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordField {
    pub feature: String,
    pub value: f64,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, value: f64) {
        self.values.insert(feature.into(), value);
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.values.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Single model row with columns exactly in `order`
    pub fn to_model_input(&self, order: &FeatureOrder) -> Result<ModelInput, InferenceError> {
        let mut columns = Vec::with_capacity(order.len());
        let mut values = Vec::with_capacity(order.len());
        for feature in order.iter() {
            let value = self
                .get(feature)
                .ok_or_else(|| InferenceError(format!("Missing value for feature '{}'", feature)))?;
            columns.push(feature.to_string());
            values.push(value);
        }
        Ok(ModelInput { columns, values })
    }

    /// Fields in `order`, skipping features the record lacks
    pub fn ordered_fields(&self, order: &FeatureOrder) -> Vec<RecordField> {
        order
            .iter()
            .filter_map(|feature| {
                self.get(feature).map(|value| RecordField { feature: feature.to_string(), value })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> FeatureOrder {
        FeatureOrder::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_model_input_follows_order_not_insertion() {
        let mut record = InputRecord::new();
        record.insert("c", 3.0);
        record.insert("a", 1.0);
        record.insert("b", 2.0);

        let input = record.to_model_input(&order(&["b", "c", "a"])).unwrap();
        assert_eq!(input.columns, vec!["b", "c", "a"]);
        assert_eq!(input.values, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_missing_feature_is_inference_error() {
        let mut record = InputRecord::new();
        record.insert("a", 1.0);
        let err = record.to_model_input(&order(&["a", "b"])).unwrap_err();
        assert_eq!(err, InferenceError("Missing value for feature 'b'".to_string()));
    }

    #[test]
    fn test_ordered_fields() {
        let mut record = InputRecord::new();
        record.insert("x", 0.5);
        record.insert("y", 1.5);
        let fields = record.ordered_fields(&order(&["y", "x"]));
        assert_eq!(fields[0], RecordField { feature: "y".into(), value: 1.5 });
        assert_eq!(fields[1], RecordField { feature: "x".into(), value: 0.5 });
    }
}
