//! Artifact Store - trained model, scaler and column schema
//!
//! Loaded once at startup, immutable afterwards. Two states only:
//! - `Loaded`: all three artifacts present and valid
//! - `Unloaded`: anything missing or broken; inference uses the fallback
//!
//! Loading never fails the caller. Problems are logged and kept as the
//! unload reason for health reporting.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, OnnxClassifier};
use super::scaler::StandardScaler;
use crate::logic::config::ScoringConfig;
use crate::logic::error::{ArtifactKind, ScoringError, ScoringResult};
use crate::logic::features::{numeric_columns, ColumnLayout};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Column name paired with its importance weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub weight: f64,
}

/// The full, consistent artifact set
pub struct ModelArtifacts {
    classifier: Box<dyn Classifier>,
    scaler: StandardScaler,
    layout: Arc<ColumnLayout>,
    importances: Option<Vec<f64>>,
    loaded_at: DateTime<Utc>,
}

impl ModelArtifacts {
    /// Assemble artifacts from parts (test doubles, embedded models)
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: StandardScaler,
        columns: Vec<String>,
    ) -> ScoringResult<Self> {
        Ok(Self {
            classifier,
            scaler,
            layout: Arc::new(ColumnLayout::new(columns)?),
            importances: None,
            loaded_at: Utc::now(),
        })
    }

    pub fn with_importances(mut self, importances: Vec<f64>) -> Self {
        self.importances = Some(importances);
        self
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn layout(&self) -> &Arc<ColumnLayout> {
        &self.layout
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Top `n` importances, paired with column names, highest first
    pub fn feature_importance(&self, n: usize) -> Vec<FeatureImportance> {
        let Some(weights) = &self.importances else {
            return Vec::new();
        };

        let mut ranked: Vec<FeatureImportance> = self
            .layout
            .columns()
            .iter()
            .zip(weights.iter())
            .filter(|(_, w)| w.is_finite())
            .map(|(name, weight)| FeatureImportance {
                name: name.clone(),
                weight: *weight,
            })
            .collect();

        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        ranked.truncate(n);
        ranked
    }
}

impl fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("model_type", &self.classifier.model_type())
            .field("columns", &self.layout.len())
            .field("scaler_features", &self.scaler.n_features())
            .field("has_importances", &self.importances.is_some())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Load status, decided once
#[derive(Debug)]
pub enum ArtifactState {
    Loaded(ModelArtifacts),
    Unloaded { reason: String },
}

// ============================================================================
// ARTIFACT STORE
// ============================================================================

#[derive(Debug)]
pub struct ArtifactStore {
    state: ArtifactState,
    model_dir: PathBuf,
}

impl ArtifactStore {
    /// Load all artifacts named by `config`. Never fails; see `is_loaded`.
    pub fn load(config: &ScoringConfig) -> Self {
        let state = match try_load(config) {
            Ok(artifacts) => {
                log::info!(
                    "Model artifacts loaded from {} ({} columns)",
                    config.model_dir().display(),
                    artifacts.layout.len()
                );
                ArtifactState::Loaded(artifacts)
            }
            Err(e) => {
                log::warn!("Model artifacts unavailable - using fallback heuristics: {}", e);
                ArtifactState::Unloaded { reason: e.to_string() }
            }
        };

        Self {
            state,
            model_dir: config.model_dir().to_path_buf(),
        }
    }

    /// Load from `dir` using default file names
    pub fn load_dir(dir: impl Into<PathBuf>) -> Self {
        Self::load(&ScoringConfig::default().with_model_dir(dir))
    }

    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self {
            state: ArtifactState::Loaded(artifacts),
            model_dir: PathBuf::from("<memory>"),
        }
    }

    pub fn unloaded(reason: impl Into<String>) -> Self {
        Self {
            state: ArtifactState::Unloaded { reason: reason.into() },
            model_dir: PathBuf::new(),
        }
    }

    pub fn state(&self) -> &ArtifactState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ArtifactState::Loaded(_))
    }

    pub fn artifacts(&self) -> Option<&ModelArtifacts> {
        match &self.state {
            ArtifactState::Loaded(artifacts) => Some(artifacts),
            ArtifactState::Unloaded { .. } => None,
        }
    }

    /// Ordered schema; empty when unloaded
    pub fn columns(&self) -> &[String] {
        self.artifacts()
            .map(|a| a.layout.columns())
            .unwrap_or(&[])
    }

    pub fn layout(&self) -> Option<&Arc<ColumnLayout>> {
        self.artifacts().map(|a| &a.layout)
    }

    /// Top `n` importances; empty if unloaded or the model has none
    pub fn feature_importance(&self, n: usize) -> Vec<FeatureImportance> {
        self.artifacts()
            .map(|a| a.feature_importance(n))
            .unwrap_or_default()
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.state {
            ArtifactState::Loaded(_) => None,
            ArtifactState::Unloaded { reason } => Some(reason),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn try_load(config: &ScoringConfig) -> ScoringResult<ModelArtifacts> {
    let columns = load_columns(&config.columns_path())?;
    let layout = ColumnLayout::new(columns)
        .map_err(|e| ScoringError::artifact_load(ArtifactKind::Columns, config.columns_path(), e))?;
    log::info!("Loaded {} feature columns", layout.len());
    log::info!(
        "Expected features: {:?}... (showing first 5)",
        &layout.columns()[..layout.len().min(5)]
    );

    let scaler = load_scaler(&config.scaler_path())?;
    let classifier = load_classifier(&config.model_path())?;
    let importances = load_importances(&config.importance_path(), layout.len());

    Ok(ModelArtifacts {
        classifier: Box::new(classifier),
        scaler,
        layout: Arc::new(layout),
        importances,
        loaded_at: Utc::now(),
    })
}

fn require_file(kind: ArtifactKind, path: &Path) -> ScoringResult<()> {
    if path.exists() {
        Ok(())
    } else {
        log::warn!("{} file not found: {}", kind, path.display());
        Err(ScoringError::artifact_load(kind, path, "file not found"))
    }
}

/// Read the ordered column list (JSON array of strings)
pub fn load_columns(path: &Path) -> ScoringResult<Vec<String>> {
    require_file(ArtifactKind::Columns, path)?;

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Vec<String>>(&content).map_err(|e| e.to_string()));

    parsed.map_err(|e| {
        log::error!("Error loading model columns from {}: {}", path.display(), e);
        ScoringError::artifact_load(ArtifactKind::Columns, path, e)
    })
}

fn load_scaler(path: &Path) -> ScoringResult<StandardScaler> {
    require_file(ArtifactKind::Scaler, path)?;

    let scaler = StandardScaler::from_file(path).map_err(|e| {
        log::error!("Error loading scaler: {}", e);
        e
    })?;

    if let Some(names) = &scaler.feature_names_in {
        if !names.iter().map(String::as_str).eq(numeric_columns()) {
            let reason = format!(
                "scaler fitted on {:?}, expected {:?}",
                names,
                numeric_columns().collect::<Vec<_>>()
            );
            log::error!("{}", reason);
            return Err(ScoringError::artifact_load(ArtifactKind::Scaler, path, reason));
        }
    }

    log::info!("Loaded scaler from {}", path.display());
    Ok(scaler)
}

fn load_classifier(path: &Path) -> ScoringResult<OnnxClassifier> {
    require_file(ArtifactKind::Classifier, path)?;

    OnnxClassifier::load(path).map_err(|e| {
        log::error!("Error loading classifier: {}", e);
        e
    })
}

/// Optional; a missing or malformed file only disables importances
fn load_importances(path: &Path, expected: usize) -> Option<Vec<f64>> {
    if !path.exists() {
        log::debug!("No feature importances at {}", path.display());
        return None;
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Vec<f64>>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(weights) => {
            if weights.len() != expected {
                log::warn!(
                    "Feature importances cover {} columns, schema has {}",
                    weights.len(),
                    expected
                );
            }
            Some(weights)
        }
        Err(e) => {
            log::warn!("Ignoring feature importances at {}: {}", path.display(), e);
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::tests::bank_columns;
    use std::fs;
    use tempfile::tempdir;

    struct ConstantClassifier(f64);

    impl Classifier for ConstantClassifier {
        fn predict_proba(&self, _features: &[f64]) -> ScoringResult<f64> {
            Ok(self.0)
        }
    }

    fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
        fs::write(dir.join(name), value.to_string()).unwrap();
    }

    fn write_scaler(dir: &Path) {
        write_json(
            dir,
            "scaler.json",
            serde_json::json!({"mean": vec![0.0; 8], "scale": vec![1.0; 8]}),
        );
    }

    #[test]
    fn test_empty_dir_is_unloaded() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::load_dir(dir.path());

        assert!(!store.is_loaded());
        assert!(store.columns().is_empty());
        assert!(store.feature_importance(15).is_empty());
        assert!(store.load_error().unwrap().contains("columns"));
    }

    #[test]
    fn test_missing_classifier_is_unloaded() {
        let dir = tempdir().unwrap();
        write_json(dir.path(), "model_columns.json", serde_json::json!(bank_columns()));
        write_scaler(dir.path());

        let store = ArtifactStore::load_dir(dir.path());
        assert!(!store.is_loaded());
        assert!(store.columns().is_empty());
        assert!(store.load_error().unwrap().contains("classifier"));
    }

    #[test]
    fn test_corrupt_columns_is_unloaded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("model_columns.json"), "{not json").unwrap();

        let store = ArtifactStore::load_dir(dir.path());
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_duplicate_columns_is_unloaded() {
        let dir = tempdir().unwrap();
        write_json(dir.path(), "model_columns.json", serde_json::json!(["age", "age"]));

        let store = ArtifactStore::load_dir(dir.path());
        assert!(store.load_error().unwrap().contains("duplicate"));
    }

    #[test]
    fn test_scaler_fitted_on_other_columns_is_unloaded() {
        let dir = tempdir().unwrap();
        write_json(dir.path(), "model_columns.json", serde_json::json!(bank_columns()));
        write_json(
            dir.path(),
            "scaler.json",
            serde_json::json!({
                "mean": vec![0.0; 8],
                "scale": vec![1.0; 8],
                "feature_names_in": ["age", "campaign", "previous", "pdays",
                                     "cons.price.idx", "cons.conf.idx", "euribor3m", "nr.employed"],
            }),
        );

        let store = ArtifactStore::load_dir(dir.path());
        assert!(store.load_error().unwrap().contains("scaler"));
    }

    #[test]
    fn test_load_columns_roundtrip() {
        let dir = tempdir().unwrap();
        write_json(dir.path(), "model_columns.json", serde_json::json!(bank_columns()));

        let columns = load_columns(&dir.path().join("model_columns.json")).unwrap();
        assert_eq!(columns.len(), 46);
        assert_eq!(columns[8], "pernah_dihubungi");
    }

    #[test]
    fn test_importances_optional_and_lenient() {
        let dir = tempdir().unwrap();
        assert!(load_importances(&dir.path().join("feature_importances.json"), 3).is_none());

        write_json(dir.path(), "feature_importances.json", serde_json::json!("oops"));
        assert!(load_importances(&dir.path().join("feature_importances.json"), 3).is_none());

        write_json(dir.path(), "feature_importances.json", serde_json::json!([0.1, 0.2]));
        assert_eq!(
            load_importances(&dir.path().join("feature_importances.json"), 3),
            Some(vec![0.1, 0.2])
        );
    }

    #[test]
    fn test_feature_importance_sorted_desc() {
        let artifacts = ModelArtifacts::new(
            Box::new(ConstantClassifier(0.5)),
            StandardScaler::identity(8),
            vec!["age".into(), "euribor3m".into(), "job_student".into(), "month_may".into()],
        )
        .unwrap()
        .with_importances(vec![0.05, 0.40, f64::NAN, 0.20]);

        let store = ArtifactStore::from_artifacts(artifacts);
        let top = store.feature_importance(2);

        assert_eq!(
            top,
            vec![
                FeatureImportance { name: "euribor3m".into(), weight: 0.40 },
                FeatureImportance { name: "month_may".into(), weight: 0.20 },
            ]
        );
        assert_eq!(store.feature_importance(10).len(), 3);
    }

    #[test]
    fn test_no_importances_is_empty() {
        let artifacts = ModelArtifacts::new(
            Box::new(ConstantClassifier(0.5)),
            StandardScaler::identity(8),
            bank_columns(),
        )
        .unwrap();

        let store = ArtifactStore::from_artifacts(artifacts);
        assert!(store.is_loaded());
        assert_eq!(store.columns().len(), 46);
        assert!(store.feature_importance(15).is_empty());
    }

    #[test]
    fn test_load_demo_artifacts() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/models");
        let store = ArtifactStore::load_dir(&dir);

        assert!(store.is_loaded(), "load error: {:?}", store.load_error());
        assert!(store.load_error().is_none());
        assert_eq!(store.columns().len(), 46);
        assert_eq!(store.model_dir(), dir.as_path());

        let artifacts = store.artifacts().unwrap();
        assert_eq!(artifacts.classifier().model_type(), "XGBoost (ONNX)");
        assert_eq!(artifacts.scaler().n_features(), 8);

        let top = store.feature_importance(1);
        assert_eq!(top[0].name, "poutcome_success");
    }
}
