//! Feature Order - authoritative model input layout
//!
//! The classifier is order-sensitive and does not validate column names,
//! so every row handed to it is built from this list and nothing else.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArtifactLoadError;

/// Ordered, non-empty, duplicate-free feature names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureOrder(Vec<String>);

impl FeatureOrder {
    pub fn new(names: Vec<String>) -> Result<Self, ArtifactLoadError> {
        if names.is_empty() {
            return Err(ArtifactLoadError::EmptyOrder);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactLoadError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self(names))
    }

    /// Load a JSON array of feature names
    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        if !path.exists() {
            return Err(ArtifactLoadError::Missing(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let names: Vec<String> = serde_json::from_str(&raw).map_err(|e| ArtifactLoadError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }
}

impl TryFrom<Vec<String>> for FeatureOrder {
    type Error = ArtifactLoadError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureOrder> for Vec<String> {
    fn from(order: FeatureOrder) -> Self {
        order.0
    }
}
