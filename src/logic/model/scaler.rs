//! Standard Scaler - numeric column normalization
//!
//! Parameters come from training (`mean`, `scale` per column) and are
//! applied as `(x - mean) / scale`. A zero scale marks a constant column
//! and is treated as 1, matching how the scaler was fitted.

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::logic::error::{ArtifactKind, ScoringError, ScoringResult};

/// Fitted standard scaler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column names seen at fit time, if the export kept them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> ScoringResult<Self> {
        let scaler = Self {
            mean,
            scale,
            feature_names_in: None,
        };
        scaler.check().map_err(ScoringError::Scaling)?;
        Ok(scaler)
    }

    /// Scaler that leaves `n` columns unchanged
    pub fn identity(n: usize) -> Self {
        Self {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
            feature_names_in: None,
        }
    }

    /// Load scaler parameters from a JSON file
    pub fn from_file(path: &Path) -> ScoringResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::artifact_load(ArtifactKind::Scaler, path, e))?;

        let scaler: StandardScaler = serde_json::from_str(&content)
            .map_err(|e| ScoringError::artifact_load(ArtifactKind::Scaler, path, e))?;

        scaler
            .check()
            .map_err(|reason| ScoringError::artifact_load(ArtifactKind::Scaler, path, reason))?;

        Ok(scaler)
    }

    fn check(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no columns".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries, scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().chain(self.scale.iter()).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        if let Some(names) = &self.feature_names_in {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "{} feature names for {} columns",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Scale every row of `x`; column count must match the fitted width
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> ScoringResult<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ScoringError::Scaling(format!(
                "X has {} features, but scaler is expecting {}",
                x.ncols(),
                self.n_features()
            )));
        }

        let mean = ArrayView1::from(self.mean.as_slice());
        let scale: Array1<f64> = self
            .scale
            .iter()
            .map(|s| if *s == 0.0 { 1.0 } else { *s })
            .collect();

        let scaled = (&x - &mean) / &scale;

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(ScoringError::Scaling("non-finite value after scaling".to_string()));
        }

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_transform_math() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.5]).unwrap();
        let x = array![[14.0, 1.0], [10.0, -1.0]];

        let scaled = scaler.transform(x.view()).unwrap();
        assert_eq!(scaled, array![[2.0, 2.0], [0.0, -2.0]]);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![5.0], vec![0.0]).unwrap();
        let scaled = scaler.transform(array![[7.0]].view()).unwrap();
        assert_eq!(scaled[[0, 0]], 2.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler = StandardScaler::identity(8);
        let err = scaler.transform(array![[1.0, 2.0, 3.0]].view()).unwrap_err();
        assert!(matches!(err, ScoringError::Scaling(_)));
    }

    #[test]
    fn test_identity() {
        let scaler = StandardScaler::identity(3);
        let x = array![[1.5, -2.0, 0.0]];
        assert_eq!(scaler.transform(x.view()).unwrap(), x);
    }

    #[test]
    fn test_new_rejects_mismatched_params() {
        assert!(StandardScaler::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mean": [40.0, 2.5], "scale": [10.0, 2.0], "feature_names_in": ["age", "campaign"]}}"#
        )
        .unwrap();

        let scaler = StandardScaler::from_file(file.path()).unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert_eq!(
            scaler.feature_names_in.as_deref(),
            Some(&["age".to_string(), "campaign".to_string()][..])
        );
    }

    #[test]
    fn test_from_file_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = StandardScaler::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::ArtifactLoad { artifact: ArtifactKind::Scaler, .. }
        ));
    }
}
