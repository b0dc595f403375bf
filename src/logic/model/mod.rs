//! Model Module - Scoring Inference Engine
//!
//! Artifact loading, scaling, classifier and the fallback heuristic.
//! The classifier sits behind a trait so the ONNX runtime can be swapped.

pub mod artifacts;
pub mod classifier;
pub mod inference;
pub mod scaler;
pub mod threshold;

// Re-export common types
pub use artifacts::{load_columns, ArtifactState, ArtifactStore, FeatureImportance, ModelArtifacts};
pub use classifier::{Classifier, OnnxClassifier};
pub use inference::{fallback_probability, predict_fallback, InferenceEngine, ModelMetadata, PredictionResult};
pub use scaler::StandardScaler;
pub use threshold::{PredictionLabel, RiskCategory};
