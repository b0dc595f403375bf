//! Error handling

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type ScoringResult<T> = Result<T, ScoringError>;

/// Which on-disk artifact a load failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    Columns,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Columns => "columns",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Degenerate request; the only error `predict` lets through
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to load {artifact} artifact from {}: {reason}", path.display())]
    ArtifactLoad {
        artifact: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error("feature layout error: {0}")]
    Layout(String),

    #[error("scaling failed: {0}")]
    Scaling(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl ScoringError {
    pub fn artifact_load(artifact: ArtifactKind, path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ScoringError::ArtifactLoad {
            artifact,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ScoringError::InvalidInput(_))
    }
}

impl From<ndarray::ShapeError> for ScoringError {
    fn from(err: ndarray::ShapeError) -> Self {
        ScoringError::Scaling(err.to_string())
    }
}
