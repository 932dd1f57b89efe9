//! Model Module - classifier artifact and its feature contract
//!
//! Tách logic inference khỏi form rendering.

pub mod artifact;
pub mod order;
pub mod registry;
pub mod tier;

// Re-export common types
pub use artifact::{ClassProbabilities, ModelInput, OnnxRiskModel, RiskModel};
pub use order::FeatureOrder;
pub use registry::{EngineStatus, LoadedModel, ModelCell, ModelState};
pub use tier::RiskTier;
