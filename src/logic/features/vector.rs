//! Feature Vector - Core data structure for ML input
//!
//! **Layout-bound feature vector**
//!
//! Every vector holds a handle to the `ColumnLayout` it was built for, so
//! positional identity is checked rather than assumed:
//! - Width always equals the layout's column count
//! - Named access goes through the layout index
//! - Layout hash detects vectors built against another schema

use std::sync::Arc;

use super::layout::ColumnLayout;
use crate::logic::error::{ScoringError, ScoringResult};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Ordered numeric values aligned 1:1 with a column layout
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    layout: Arc<ColumnLayout>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create a zeroed vector for `layout`
    pub fn zeros(layout: Arc<ColumnLayout>) -> Self {
        let values = vec![0.0; layout.len()];
        Self { layout, values }
    }

    pub fn layout(&self) -> &Arc<ColumnLayout> {
        &self.layout
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout.hash()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by column name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.layout.index_of(name).and_then(|i| self.get(i))
    }

    /// Set feature by index; out-of-range writes are ignored
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Set feature by column name; returns false if the column does not exist
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        match self.layout.index_of(name) {
            Some(index) => self.set(index, value),
            None => false,
        }
    }

    /// Check that this vector belongs to `expected`
    pub fn validate(&self, expected: &ColumnLayout) -> ScoringResult<()> {
        if self.layout.hash() != expected.hash() || self.values.len() != expected.len() {
            return Err(ScoringError::Layout(format!(
                "feature layout mismatch: expected {} columns (hash: {:08x}), got {} (hash: {:08x})",
                expected.len(),
                expected.hash(),
                self.values.len(),
                self.layout.hash()
            )));
        }
        Ok(())
    }

    /// Iterate `(column, value)` pairs in layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.layout
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = self
            .named_values()
            .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
            .collect();

        serde_json::json!({
            "layout_hash": self.layout.hash(),
            "feature_count": self.values.len(),
            "values": self.values,
            "named_values": named,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
