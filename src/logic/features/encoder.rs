//! Feature Encoder - raw lead -> full-width feature vector
//!
//! Pure function of (lead, layout). Steps, in order:
//! 1. zero vector sized to the layout
//! 2. numeric passthroughs (with defaults)
//! 3. derived "previously contacted" indicator
//! 4. one-hot groups: `{attribute}_{level}` set to 1 only if that column exists
//! 5. binary indicators
//!
//! Anything not written stays 0, which is exactly how the dropped reference
//! level of each dummy group is represented.

use std::sync::Arc;

use super::layout::ColumnLayout;
use super::lead::RawLead;
use super::schema::{BINARY_FIELDS, CATEGORICAL_FIELDS, CONTACT_HISTORY, NUMERIC_FIELDS};
use super::vector::FeatureVector;

fn indicator(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Stateless encoder over the attribute table in `schema.rs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, raw: &RawLead, layout: &Arc<ColumnLayout>) -> FeatureVector {
        let mut vector = FeatureVector::zeros(Arc::clone(layout));

        for field in NUMERIC_FIELDS.iter() {
            vector.set_by_name(field.column, field.resolve(raw));
        }

        vector.set_by_name(
            CONTACT_HISTORY.column,
            indicator(CONTACT_HISTORY.previously_contacted(raw)),
        );

        for field in CATEGORICAL_FIELDS.iter() {
            let level = field.resolve(raw);
            let column = field.column_for(&level);
            if !vector.set_by_name(&column, 1.0) {
                // Reference level or a level the model never saw
                log::debug!("No column '{}' in schema, {} group left at zero", column, field.key);
            }
        }

        for field in BINARY_FIELDS.iter() {
            vector.set_by_name(field.column, indicator(field.is_positive(raw)));
        }

        vector
    }
}
