//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change where artifacts are looked up, only edit this file
//! (or set the matching environment variable, see `logic::config`).

/// Default artifact directory (relative to the working directory)
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Default classifier artifact (ONNX export of the trained XGBoost model)
pub const DEFAULT_MODEL_FILE: &str = "model_final_xgb.onnx";

/// Default scaler artifact (standard scaler parameters as JSON)
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Default ordered column list artifact
pub const DEFAULT_COLUMNS_FILE: &str = "model_columns.json";

/// Optional per-column importance weights
pub const DEFAULT_IMPORTANCE_FILE: &str = "feature_importances.json";

/// Version tag reported when the trained model answers
pub const DEFAULT_MODEL_VERSION: &str = "v1.0-xgb-bank";

/// Version tag reported by the heuristic fallback
pub const FALLBACK_MODEL_VERSION: &str = "v0.0-dummy";

/// Number of feature importances exposed in metadata
pub const DEFAULT_TOP_FEATURES: usize = 15;

/// Number of expected columns echoed back in metadata
pub const SAMPLE_COLUMN_COUNT: usize = 10;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Lead Scoring Core";
