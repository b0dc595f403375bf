//! Raw Lead - loosely structured attribute map
//!
//! A lead arrives as whatever the upstream layer deserialized: numbers,
//! strings, the odd boolean, explicit nulls. Nothing here applies defaults;
//! that is the job of the attribute table in `schema.rs`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::error::{ScoringError, ScoringResult};

// ============================================================================
// LEAD VALUE
// ============================================================================

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadValue {
    /// Explicit null, treated exactly like an absent key
    Null,
    Flag(bool),
    Number(f64),
    Text(String),
}

impl LeadValue {
    pub fn is_null(&self) -> bool {
        matches!(self, LeadValue::Null)
    }

    /// Numeric reading: numbers as-is, numeric strings parsed, flags as 0/1
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LeadValue::Number(n) if n.is_finite() => Some(*n),
            LeadValue::Number(_) => None,
            LeadValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            LeadValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            LeadValue::Null => None,
        }
    }

    /// Category level as it would appear in a dummy column suffix
    pub fn as_category(&self) -> Option<Cow<'_, str>> {
        match self {
            LeadValue::Text(s) => Some(Cow::Borrowed(s.trim())),
            LeadValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            LeadValue::Number(n) => Some(Cow::Owned(n.to_string())),
            LeadValue::Flag(true) => Some(Cow::Borrowed("yes")),
            LeadValue::Flag(false) => Some(Cow::Borrowed("no")),
            LeadValue::Null => None,
        }
    }
}

impl From<f64> for LeadValue {
    fn from(value: f64) -> Self {
        LeadValue::Number(value)
    }
}

impl From<i64> for LeadValue {
    fn from(value: i64) -> Self {
        LeadValue::Number(value as f64)
    }
}

impl From<i32> for LeadValue {
    fn from(value: i32) -> Self {
        LeadValue::Number(f64::from(value))
    }
}

impl From<bool> for LeadValue {
    fn from(value: bool) -> Self {
        LeadValue::Flag(value)
    }
}

impl From<&str> for LeadValue {
    fn from(value: &str) -> Self {
        LeadValue::Text(value.to_string())
    }
}

impl From<String> for LeadValue {
    fn from(value: String) -> Self {
        LeadValue::Text(value)
    }
}

// ============================================================================
// RAW LEAD
// ============================================================================

/// Attribute name -> scalar value, partially populated
///
/// Backed by a `BTreeMap` so iteration order never depends on how the
/// caller built the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLead {
    attributes: BTreeMap<String, LeadValue>,
}

impl RawLead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LeadValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LeadValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Parse a JSON object into a lead.
    ///
    /// Anything other than an object of scalars is rejected as invalid input.
    pub fn from_json(value: serde_json::Value) -> ScoringResult<Self> {
        if !value.is_object() {
            return Err(ScoringError::InvalidInput(
                "lead must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ScoringError::InvalidInput(e.to_string()))
    }

    /// Value for `key`, with explicit nulls reported as absent
    pub fn get(&self, key: &str) -> Option<&LeadValue> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(LeadValue::as_number)
    }

    pub fn category(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(LeadValue::as_category)
    }

    /// Number of attributes carrying a non-null value
    pub fn populated_count(&self) -> usize {
        self.attributes.values().filter(|v| !v.is_null()).count()
    }

    /// True when no attribute carries a value
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LeadValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for RawLead
where
    K: Into<String>,
    V: Into<LeadValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lead = RawLead::new();
        for (k, v) in iter {
            lead.insert(k, v);
        }
        lead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_mixed_scalars() {
        let lead = RawLead::from_json(json!({
            "age": 41,
            "job": "technician",
            "housing": true,
            "pdays": null,
            "campaign": "3",
        }))
        .unwrap();

        assert_eq!(lead.number("age"), Some(41.0));
        assert_eq!(lead.category("job").as_deref(), Some("technician"));
        assert_eq!(lead.category("housing").as_deref(), Some("yes"));
        assert_eq!(lead.number("campaign"), Some(3.0));
        assert!(!lead.contains("pdays"));
        assert_eq!(lead.populated_count(), 4);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = RawLead::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_nested_values() {
        let err = RawLead::from_json(json!({"job": {"title": "chef"}})).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_all_null_counts_as_empty() {
        let lead = RawLead::from_json(json!({"age": null, "job": null})).unwrap();
        assert!(lead.is_empty());
        assert!(RawLead::new().is_empty());
    }

    #[test]
    fn test_numeric_category_formatting() {
        let lead = RawLead::new().with("day_of_week", 3).with("month", 2.5);
        assert_eq!(lead.category("day_of_week").as_deref(), Some("3"));
        assert_eq!(lead.category("month").as_deref(), Some("2.5"));
    }

    #[test]
    fn test_unparseable_number_is_absent() {
        let lead = RawLead::new().with("age", "forty");
        assert_eq!(lead.number("age"), None);
        assert!(lead.contains("age"));
    }
}
