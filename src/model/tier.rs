//! Risk Tier - probability bucketing
//!
//! Buckets are inclusive-low / exclusive-high on the percent scale,
//! except High which is closed at 100.

use serde::{Deserialize, Serialize};

/// Percent at or above which risk is Medium
pub const MEDIUM_FROM_PERCENT: f64 = 30.0;

/// Percent at or above which risk is High
pub const HIGH_FROM_PERCENT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent < MEDIUM_FROM_PERCENT {
            RiskTier::Low
        } else if percent < HIGH_FROM_PERCENT {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// CSS class of the tier message box
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskTier::Low => "tier-low",
            RiskTier::Medium => "tier-medium",
            RiskTier::High => "tier-high",
        }
    }
}
