//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// ONNX classifier artifact
    pub model_path: PathBuf,

    /// JSON array of feature names in model input order
    pub feature_names_path: PathBuf,

    /// Optional JSON schema replacing the built-in feature table
    pub schema_path: Option<PathBuf>,

    /// Sessions idle longer than this are pruned
    pub session_idle_minutes: u64,

    /// "text" or "json"
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("xgboost_model_deploy.onnx")),

            feature_names_path: lookup("FEATURE_NAMES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("feature_names_xgboost.json")),

            schema_path: lookup("SCHEMA_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            session_idle_minutes: lookup("SESSION_IDLE_MINUTES")
                .and_then(|m| m.parse().ok())
                .unwrap_or(60),

            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "text".to_string()),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
