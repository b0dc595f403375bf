//! Column Layout - the trained model's feature schema
//!
//! **CRITICAL: the loaded column list is ground truth**
//!
//! ## Rules (NEVER break these):
//! 1. Position `i` of every feature vector means `columns[i]`
//! 2. The list is fixed after load; nothing appends or reorders it
//! 3. Encoders write only to columns that already exist here
//!
//! The CRC32 hash over the ordered names lets a vector built for one
//! schema be caught before it reaches a model trained on another.

use std::collections::HashMap;

use crc32fast::Hasher;

use super::schema::{NUMERIC_COUNT, NUMERIC_FIELDS};
use crate::logic::error::{ScoringError, ScoringResult};

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered column list
pub fn compute_layout_hash<S: AsRef<str>>(columns: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in columns {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// Ordered, unique column names with O(1) name -> position lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    hash: u32,
}

impl ColumnLayout {
    /// Build a layout; rejects empty lists and duplicate names
    pub fn new(columns: Vec<String>) -> ScoringResult<Self> {
        if columns.is_empty() {
            return Err(ScoringError::Layout("column list is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ScoringError::Layout(format!("duplicate column '{}'", name)));
            }
        }

        let hash = compute_layout_hash(&columns);
        Ok(Self { columns, index, hash })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Positions of the scaler's columns, in scaler order.
    ///
    /// Fails if the schema lacks any of them: the scaler cannot run on a
    /// partial numeric block.
    pub fn numeric_indices(&self) -> ScoringResult<[usize; NUMERIC_COUNT]> {
        let mut indices = [0usize; NUMERIC_COUNT];
        for (slot, field) in indices.iter_mut().zip(NUMERIC_FIELDS.iter()) {
            *slot = self.index_of(field.column).ok_or_else(|| {
                ScoringError::Layout(format!("numeric column '{}' missing from schema", field.column))
            })?;
        }
        Ok(indices)
    }
}

// ============================================================================
// TESTS
// ============================================================================
