//! Attribute Schema - every raw lead attribute, enumerated once
//!
//! **This table controls how raw leads become model columns.**
//!
//! Each attribute carries its default, so no lookup anywhere else in the
//! crate has to invent one. Column names follow the training-time dummy
//! encoding (`{attribute}_{level}`); the loaded column list decides which
//! of those columns actually exist.

use std::borrow::Cow;

use super::lead::RawLead;

// ============================================================================
// FIELD KINDS
// ============================================================================

/// Numeric attribute copied verbatim into a single column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    /// Raw key as sent by the API layer
    pub key: &'static str,
    /// Column name in the trained schema (also accepted as a raw key)
    pub column: &'static str,
    pub default: f64,
}

impl NumericField {
    pub fn resolve(&self, raw: &RawLead) -> f64 {
        raw.number(self.key)
            .or_else(|| raw.number(self.column))
            .unwrap_or(self.default)
    }
}

/// Categorical attribute, one-hot encoded as `{key}_{level}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoricalField {
    pub key: &'static str,
    pub default: &'static str,
}

impl CategoricalField {
    pub fn resolve<'a>(&self, raw: &'a RawLead) -> Cow<'a, str> {
        raw.category(self.key)
            .unwrap_or(Cow::Borrowed(self.default))
    }

    pub fn column_for(&self, level: &str) -> String {
        format!("{}_{}", self.key, level)
    }
}

/// Two-level attribute collapsed to one indicator column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryField {
    pub key: &'static str,
    pub column: &'static str,
    /// Literal that turns the indicator on
    pub positive: &'static str,
    pub default: &'static str,
}

impl BinaryField {
    pub fn resolve<'a>(&self, raw: &'a RawLead) -> Cow<'a, str> {
        raw.category(self.key)
            .unwrap_or(Cow::Borrowed(self.default))
    }

    pub fn is_positive(&self, raw: &RawLead) -> bool {
        self.resolve(raw) == self.positive
    }
}

/// Days since last contact, reduced to "was this lead ever contacted"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactHistoryField {
    pub key: &'static str,
    pub column: &'static str,
    /// Sentinel meaning "never contacted"
    pub never: f64,
}

impl ContactHistoryField {
    pub fn previously_contacted(&self, raw: &RawLead) -> bool {
        match raw.number(self.key) {
            Some(days) => days != self.never && days >= 0.0,
            None => false,
        }
    }
}

// ============================================================================
// NUMERIC PASSTHROUGHS
// ============================================================================

pub const AGE: NumericField = NumericField { key: "age", column: "age", default: 30.0 };
pub const CAMPAIGN: NumericField = NumericField { key: "campaign", column: "campaign", default: 1.0 };
pub const PREVIOUS: NumericField = NumericField { key: "previous", column: "previous", default: 0.0 };
pub const EMP_VAR_RATE: NumericField = NumericField { key: "emp_var_rate", column: "emp.var.rate", default: -1.8 };
pub const CONS_PRICE_IDX: NumericField = NumericField { key: "cons_price_idx", column: "cons.price.idx", default: 92.893 };
pub const CONS_CONF_IDX: NumericField = NumericField { key: "cons_conf_idx", column: "cons.conf.idx", default: -46.2 };
pub const EURIBOR_3M: NumericField = NumericField { key: "euribor3m", column: "euribor3m", default: 1.313 };
pub const NR_EMPLOYED: NumericField = NumericField { key: "nr_employed", column: "nr.employed", default: 5099.1 };

/// Columns the scaler was fitted on, in the scaler's own column order
pub const NUMERIC_FIELDS: [NumericField; NUMERIC_COUNT] = [
    AGE,
    CAMPAIGN,
    PREVIOUS,
    EMP_VAR_RATE,
    CONS_PRICE_IDX,
    CONS_CONF_IDX,
    EURIBOR_3M,
    NR_EMPLOYED,
];

pub const NUMERIC_COUNT: usize = 8;

// ============================================================================
// DERIVED
// ============================================================================

pub const CONTACT_HISTORY: ContactHistoryField = ContactHistoryField {
    key: "pdays",
    column: "pernah_dihubungi",
    never: 999.0,
};

// ============================================================================
// ONE-HOT GROUPS
// ============================================================================

pub const JOB: CategoricalField = CategoricalField { key: "job", default: "unknown" };
pub const MARITAL: CategoricalField = CategoricalField { key: "marital", default: "single" };
pub const EDUCATION: CategoricalField = CategoricalField { key: "education", default: "high.school" };
pub const MONTH: CategoricalField = CategoricalField { key: "month", default: "may" };
pub const DAY_OF_WEEK: CategoricalField = CategoricalField { key: "day_of_week", default: "mon" };
pub const POUTCOME: CategoricalField = CategoricalField { key: "poutcome", default: "nonexistent" };

pub const CONTACT_CHANNEL: CategoricalField = CategoricalField { key: "contact", default: "cellular" };

pub const CATEGORICAL_FIELDS: [CategoricalField; 7] = [
    JOB,
    MARITAL,
    EDUCATION,
    CONTACT_CHANNEL,
    MONTH,
    DAY_OF_WEEK,
    POUTCOME,
];

// ============================================================================
// BINARY INDICATORS
// ============================================================================

pub const CREDIT_DEFAULT: BinaryField = BinaryField { key: "default", column: "default_yes", positive: "yes", default: "no" };
pub const HOUSING: BinaryField = BinaryField { key: "housing", column: "housing_yes", positive: "yes", default: "no" };
pub const LOAN: BinaryField = BinaryField { key: "loan", column: "loan_yes", positive: "yes", default: "no" };
// Schemas that drop the cellular level keep only this indicator
pub const CONTACT: BinaryField = BinaryField { key: "contact", column: "contact_telephone", positive: "telephone", default: "cellular" };

pub const BINARY_FIELDS: [BinaryField; 4] = [CREDIT_DEFAULT, HOUSING, LOAN, CONTACT];

/// Scaler column names, in scaler order
pub fn numeric_columns() -> impl Iterator<Item = &'static str> {
    NUMERIC_FIELDS.iter().map(|f| f.column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_defaults_apply() {
        let raw = RawLead::new();
        assert_eq!(AGE.resolve(&raw), 30.0);
        assert_eq!(NR_EMPLOYED.resolve(&raw), 5099.1);
    }

    #[test]
    fn test_numeric_column_alias() {
        let raw = RawLead::new().with("emp.var.rate", 1.1);
        assert_eq!(EMP_VAR_RATE.resolve(&raw), 1.1);

        // API key wins when both are present
        let raw = raw.with("emp_var_rate", -0.1);
        assert_eq!(EMP_VAR_RATE.resolve(&raw), -0.1);
    }

    #[test]
    fn test_contact_history_sentinels() {
        let contacted = |v: f64| CONTACT_HISTORY.previously_contacted(&RawLead::new().with("pdays", v));

        assert!(contacted(0.0));
        assert!(contacted(6.0));
        assert!(!contacted(999.0));
        assert!(!contacted(-1.0));
        assert!(!CONTACT_HISTORY.previously_contacted(&RawLead::new()));
    }

    #[test]
    fn test_binary_positive_literals() {
        assert!(HOUSING.is_positive(&RawLead::new().with("housing", "yes")));
        assert!(!HOUSING.is_positive(&RawLead::new().with("housing", "unknown")));
        assert!(!HOUSING.is_positive(&RawLead::new()));
        assert!(CONTACT.is_positive(&RawLead::new().with("contact", "telephone")));
        assert!(!CONTACT.is_positive(&RawLead::new()));
    }

    #[test]
    fn test_categorical_column_names() {
        assert_eq!(JOB.column_for("admin."), "job_admin.");
        assert_eq!(DAY_OF_WEEK.column_for("thu"), "day_of_week_thu");
        assert_eq!(EDUCATION.resolve(&RawLead::new()), "high.school");
    }

    #[test]
    fn test_numeric_field_count() {
        assert_eq!(NUMERIC_FIELDS.len(), NUMERIC_COUNT);
        let names: Vec<_> = numeric_columns().collect();
        assert_eq!(names[3], "emp.var.rate");
        assert_eq!(names[7], "nr.employed");
    }
}
