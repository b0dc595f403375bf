//! Classifier - ONNX Runtime Integration
//!
//! Load và chạy ONNX model.
//! The trait keeps the engine independent of the runtime, so tests and
//! embedders can plug in their own model.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::logic::error::{ArtifactKind, ScoringError, ScoringResult};

/// Output name skl2onnx/onnxmltools give the class-probability tensor
const PROBABILITY_OUTPUT: &str = "probabilities";

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over one feature row in schema order
pub trait Classifier: Send + Sync {
    /// Positive-class probability for `features`
    fn predict_proba(&self, features: &[f64]) -> ScoringResult<f64>;

    /// Human-readable model family, reported in metadata
    fn model_type(&self) -> &str {
        "custom"
    }
}

/// `probabilities` if the graph has it, else the last output
fn pick_probability_output<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut last = None;
    for name in names {
        if name == PROBABILITY_OUTPUT {
            return Some(name);
        }
        last = Some(name);
    }
    last
}

/// Positive-class probability of a single row.
///
/// `[p(no), p(yes)]` from classifier exports; some emit only `[p(yes)]`.
fn positive_probability(data: &[f32]) -> ScoringResult<f64> {
    match data {
        [_, positive, ..] => Ok(f64::from(*positive)),
        [positive] => Ok(f64::from(*positive)),
        [] => Err(ScoringError::Inference("Empty probability output".to_string())),
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Trained model exported to ONNX (`float32[1, N]` in, `float32[1, 2]` out)
pub struct OnnxClassifier {
    // Session::run needs &mut
    session: Mutex<Session>,
    output_name: String,
    source: PathBuf,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("output_name", &self.output_name)
            .field("source", &self.source)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load ONNX model từ file
    pub fn load(model_path: &Path) -> ScoringResult<Self> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        let load_err = |e: String| ScoringError::artifact_load(ArtifactKind::Classifier, model_path, e);

        let session = Session::builder()
            .map_err(|e| load_err(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_err(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| load_err(format!("Failed to load model: {}", e)))?;

        Self::from_session(session, model_path.to_path_buf()).map_err(load_err)
    }

    fn from_session(session: Session, source: PathBuf) -> Result<Self, String> {
        let output_name = pick_probability_output(session.outputs.iter().map(|o| o.name.as_str()))
            .map(str::to_string)
            .ok_or_else(|| "No output defined".to_string())?;

        log::debug!("Reading class probabilities from output '{}'", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            source,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, features: &[f64]) -> ScoringResult<f64> {
        let input: Vec<f32> = features.iter().map(|v| *v as f32).collect();

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), input)
            .map_err(|e| ScoringError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ScoringError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ScoringError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| ScoringError::Inference("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ScoringError::Inference(format!("Extract error: {}", e)))?;

        positive_probability(data)
    }

    fn model_type(&self) -> &str {
        "XGBoost (ONNX)"
    }
}
