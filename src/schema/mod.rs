//! Schema Module - feature name -> input widget semantics
//!
//! The schema is keyed by name only. Declaration order carries no meaning:
//! widget and model column order always come from the feature-order artifact.

pub mod spec;
pub mod table;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

pub use spec::{CategoryOption, FeatureSpec, NumericRange, FALLBACK_RANGE};

/// One entry of a schema override file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(flatten)]
    pub spec: FeatureSpec,
}

/// Spec resolved for one feature
#[derive(Debug, Clone)]
pub struct ResolvedSpec<'a> {
    pub spec: Cow<'a, FeatureSpec>,
    /// True when the name had no schema entry
    pub fallback: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    specs: HashMap<String, FeatureSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in hypothermia feature table
    pub fn builtin() -> Self {
        let mut schema = Self::new();
        for (name, spec) in table::entries() {
            schema.specs.insert(name, spec);
        }
        schema
    }

    pub fn from_entries<I>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = SchemaEntry>,
    {
        let mut schema = Self::new();
        for entry in entries {
            schema.insert(entry.name, entry.spec)?;
        }
        Ok(schema)
    }

    /// Load a JSON array of [`SchemaEntry`]
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::Read(format!("{}: {}", path.display(), e)))?;
        let entries: Vec<SchemaEntry> = serde_json::from_str(&raw)
            .map_err(|e| SchemaError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_entries(entries)
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FeatureSpec) -> Result<(), SchemaError> {
        let name = name.into();
        spec.validate(&name)?;
        if self.specs.contains_key(&name) {
            return Err(SchemaError::DuplicateFeature(name));
        }
        self.specs.insert(name, spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.specs.get(name)
    }

    /// Resolve a feature, falling back to the generic numeric range.
    ///
    /// A missing entry is a schema gap: logged, never surfaced to the user.
    pub fn resolve(&self, name: &str) -> ResolvedSpec<'_> {
        match self.specs.get(name) {
            Some(spec) => ResolvedSpec { spec: Cow::Borrowed(spec), fallback: false },
            None => {
                tracing::debug!("Schema gap: no entry for feature '{}', using fallback range", name);
                ResolvedSpec { spec: Cow::Owned(FeatureSpec::fallback()), fallback: true }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
