//! Lead Scoring Core
//!
//! Loads a trained bank-marketing classifier with its scaler and column
//! schema, encodes raw leads, and returns a probability, score, label and
//! risk band. Falls back to a fixed heuristic when no model is available.

pub mod constants;
pub mod logic;

pub use logic::config::ScoringConfig;
pub use logic::error::{ArtifactKind, ScoringError, ScoringResult};
pub use logic::features::{FeatureEncoder, FeatureVector, LeadValue, RawLead};
pub use logic::model::{
    ArtifactStore, InferenceEngine, ModelMetadata, PredictionLabel, PredictionResult, RiskCategory,
};
