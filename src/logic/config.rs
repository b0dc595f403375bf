//! Configuration module
//!
//! Artifact locations and reporting knobs, read from the environment.
//! Policy thresholds (risk bands, fallback clamp) are not configuration;
//! they are constants in `model::threshold`.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_COLUMNS_FILE, DEFAULT_IMPORTANCE_FILE, DEFAULT_MODEL_DIR, DEFAULT_MODEL_FILE,
    DEFAULT_MODEL_VERSION, DEFAULT_SCALER_FILE, DEFAULT_TOP_FEATURES,
};

/// Scoring configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Directory holding the model artifacts
    pub model_dir: PathBuf,

    /// Classifier file name inside `model_dir`
    pub model_file: String,

    /// Scaler file name inside `model_dir`
    pub scaler_file: String,

    /// Column list file name inside `model_dir`
    pub columns_file: String,

    /// Optional feature importance file name inside `model_dir`
    pub importance_file: String,

    /// Version tag reported for trained-model predictions
    pub model_version: String,

    /// How many feature importances metadata exposes
    pub top_features: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            scaler_file: DEFAULT_SCALER_FILE.to_string(),
            columns_file: DEFAULT_COLUMNS_FILE.to_string(),
            importance_file: DEFAULT_IMPORTANCE_FILE.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            top_features: DEFAULT_TOP_FEATURES,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            model_dir: lookup("LEAD_SCORING_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),

            model_file: lookup("LEAD_SCORING_MODEL_FILE").unwrap_or(defaults.model_file),

            scaler_file: lookup("LEAD_SCORING_SCALER_FILE").unwrap_or(defaults.scaler_file),

            columns_file: lookup("LEAD_SCORING_COLUMNS_FILE").unwrap_or(defaults.columns_file),

            importance_file: lookup("LEAD_SCORING_IMPORTANCE_FILE")
                .unwrap_or(defaults.importance_file),

            model_version: lookup("LEAD_SCORING_MODEL_VERSION")
                .unwrap_or(defaults.model_version),

            top_features: lookup("LEAD_SCORING_TOP_FEATURES")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.top_features),
        }
    }

    /// Same configuration pointed at another artifact directory
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join(&self.scaler_file)
    }

    pub fn columns_path(&self) -> PathBuf {
        self.model_dir.join(&self.columns_file)
    }

    pub fn importance_path(&self) -> PathBuf {
        self.model_dir.join(&self.importance_file)
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}
