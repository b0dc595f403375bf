//! Inference Engine - lead scoring
//!
//! Trained model if the artifact store is loaded, fallback heuristic
//! otherwise. Each `predict` is independent: the engine only reads the
//! store, so one instance can be shared across threads without locking.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::artifacts::{ArtifactStore, FeatureImportance, ModelArtifacts};
use super::scaler::StandardScaler;
use super::threshold::{score_from_probability, PredictionLabel, RiskCategory};
use crate::constants::{DEFAULT_MODEL_VERSION, DEFAULT_TOP_FEATURES, FALLBACK_MODEL_VERSION, SAMPLE_COLUMN_COUNT};
use crate::logic::config::ScoringConfig;
use crate::logic::error::{ScoringError, ScoringResult};
use crate::logic::features::schema::{AGE, HOUSING, JOB};
use crate::logic::features::{FeatureEncoder, FeatureVector, RawLead, NUMERIC_COUNT};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f64,       // 0.0 - 1.0
    pub score: u8,              // 0 - 100
    pub prediction_label: PredictionLabel,
    pub risk_category: RiskCategory,
    pub model_version: String,  // trained tag or "v0.0-dummy"
    pub features_used: usize,
}

impl PredictionResult {
    pub fn from_probability(probability: f64, model_version: impl Into<String>, features_used: usize) -> Self {
        Self {
            probability,
            score: score_from_probability(probability),
            prediction_label: PredictionLabel::from_probability(probability),
            risk_category: RiskCategory::from_probability(probability),
            model_version: model_version.into(),
            features_used,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.model_version == FALLBACK_MODEL_VERSION
    }
}

/// Model metadata for health/inspection endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_version: String,
    pub is_loaded: bool,
    pub model_type: String,
    pub scaler_loaded: bool,
    pub column_count: usize,
    pub sample_expected_columns: Vec<String>,
    pub top_feature_importances: Vec<FeatureImportance>,
    pub layout_hash: Option<u32>,
    pub model_dir: String,
    pub loaded_at: Option<DateTime<Utc>>,
    pub load_error: Option<String>,
}

/// How a prediction gets computed
pub(crate) enum Strategy<'a> {
    Trained(&'a ModelArtifacts),
    Heuristic,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct InferenceEngine {
    store: Arc<ArtifactStore>,
    encoder: FeatureEncoder,
    model_version: String,
    top_features: usize,
}

impl InferenceEngine {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self {
            store,
            encoder: FeatureEncoder::new(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            top_features: DEFAULT_TOP_FEATURES,
        }
    }

    pub fn with_config(store: Arc<ArtifactStore>, config: &ScoringConfig) -> Self {
        Self {
            model_version: config.model_version.clone(),
            top_features: config.top_features,
            ..Self::new(store)
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub(crate) fn strategy(&self) -> Strategy<'_> {
        match self.store.artifacts() {
            Some(artifacts) => Strategy::Trained(artifacts),
            None => Strategy::Heuristic,
        }
    }

    /// Score a lead.
    ///
    /// Only an empty lead is an error. Any failure in the trained path is
    /// logged and answered by the fallback, tagged via `model_version`.
    pub fn predict(&self, raw: &RawLead) -> ScoringResult<PredictionResult> {
        if raw.is_empty() {
            return Err(ScoringError::InvalidInput(
                "lead must carry at least one attribute".to_string(),
            ));
        }

        let result = match self.strategy() {
            Strategy::Trained(artifacts) => match self.predict_trained(artifacts, raw) {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Prediction error ({}), using fallback", e);
                    predict_fallback(raw)
                }
            },
            Strategy::Heuristic => {
                log::debug!("Model not loaded, using fallback");
                predict_fallback(raw)
            }
        };

        Ok(result)
    }

    /// Encode a lead against the loaded schema (unscaled)
    pub fn encode(&self, raw: &RawLead) -> Option<FeatureVector> {
        self.store
            .layout()
            .map(|layout| self.encoder.encode(raw, layout))
    }

    fn predict_trained(&self, artifacts: &ModelArtifacts, raw: &RawLead) -> ScoringResult<PredictionResult> {
        let layout = artifacts.layout();

        let mut vector = self.encoder.encode(raw, layout);
        vector.validate(layout)?;
        scale_numeric(&mut vector, artifacts.scaler())?;

        let probability = artifacts.classifier().predict_proba(vector.as_slice())?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::Inference(format!(
                "probability {} outside [0, 1]",
                probability
            )));
        }

        Ok(PredictionResult::from_probability(probability, self.model_version.as_str(), vector.len()))
    }

    pub fn metadata(&self) -> ModelMetadata {
        let model_dir = self.store.model_dir().display().to_string();

        match self.store.artifacts() {
            Some(artifacts) => {
                let layout = artifacts.layout();
                ModelMetadata {
                    model_version: self.model_version.clone(),
                    is_loaded: true,
                    model_type: artifacts.classifier().model_type().to_string(),
                    scaler_loaded: true,
                    column_count: layout.len(),
                    sample_expected_columns: layout
                        .columns()
                        .iter()
                        .take(SAMPLE_COLUMN_COUNT)
                        .cloned()
                        .collect(),
                    top_feature_importances: artifacts.feature_importance(self.top_features),
                    layout_hash: Some(layout.hash()),
                    model_dir,
                    loaded_at: Some(artifacts.loaded_at()),
                    load_error: None,
                }
            }
            None => ModelMetadata {
                model_version: FALLBACK_MODEL_VERSION.to_string(),
                is_loaded: false,
                model_type: "Heuristic".to_string(),
                scaler_loaded: false,
                column_count: 0,
                sample_expected_columns: Vec::new(),
                top_feature_importances: Vec::new(),
                layout_hash: None,
                model_dir,
                loaded_at: None,
                load_error: self.store.load_error().map(str::to_string),
            },
        }
    }
}

// ============================================================================
// SCALING
// ============================================================================

/// Scale the numeric block in place; every other position is untouched
pub fn scale_numeric(vector: &mut FeatureVector, scaler: &StandardScaler) -> ScoringResult<()> {
    let indices = vector.layout().numeric_indices()?;

    let numeric = indices
        .iter()
        .map(|&i| {
            vector
                .get(i)
                .ok_or_else(|| ScoringError::Layout(format!("column index {} out of range", i)))
        })
        .collect::<ScoringResult<Vec<f64>>>()?;

    let block = Array2::from_shape_vec((1, NUMERIC_COUNT), numeric)?;
    let scaled = scaler.transform(block.view())?;

    for (&index, &value) in indices.iter().zip(scaled.row(0).iter()) {
        vector.set(index, value);
    }

    Ok(())
}

// ============================================================================
// FALLBACK
// ============================================================================

/// Fallback probability from age, job and housing loan.
///
/// Worked in tenths so equal inputs land on exactly the same float.
pub fn fallback_probability(raw: &RawLead) -> f64 {
    let age = AGE.resolve(raw);
    let job = JOB.resolve(raw);
    let housing = HOUSING.resolve(raw);

    let mut tenths: i32 = 3;

    if age < 30.0 {
        tenths += 2;
    } else if age > 60.0 {
        tenths -= 1;
    }

    match job.as_ref() {
        "management" | "technician" | "admin." => tenths += 2,
        "student" | "unemployed" => tenths -= 1,
        _ => {}
    }

    if housing == "no" {
        tenths += 1;
    }

    f64::from(tenths.clamp(1, 9)) / 10.0
}

/// Fallback heuristic prediction (no model)
pub fn predict_fallback(raw: &RawLead) -> PredictionResult {
    PredictionResult::from_probability(
        fallback_probability(raw),
        FALLBACK_MODEL_VERSION,
        raw.populated_count(),
    )
}

// ============================================================================
// UNIT TESTS
// ============================================================================
