//! Features Module - Feature Encoding Engine
//!
//! Turns a loosely structured lead into the fixed-width vector the trained
//! model expects. The attribute table (`schema`) is separate from the
//! encoding pass (`encoder`) so defaults are declared in one place.

pub mod encoder;
pub mod layout;
pub mod lead;
pub mod schema;
pub mod vector;


// Re-export common types
pub use encoder::FeatureEncoder;
pub use layout::{compute_layout_hash, ColumnLayout};
pub use lead::{LeadValue, RawLead};
pub use schema::{numeric_columns, NUMERIC_COUNT};
pub use vector::FeatureVector;
