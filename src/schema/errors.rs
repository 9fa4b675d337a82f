//! Schema validation errors.
//!
//! Validation stops at the first violation across a batch; the error
//! names the offending field and the rule it broke.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// The schema rule a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolatedRule {
    /// Required field missing or null
    Required,
    /// Value type does not match the declared type
    Type,
    /// Numeric value below the declared minimum
    Min,
    /// Numeric value above the declared maximum
    Max,
    /// String length differs from the declared exact length
    Length,
    /// Stringified value does not match the declared pattern
    Pattern,
}

impl ViolatedRule {
    /// Returns the rule name as it appears in schema definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolatedRule::Required => "required",
            ViolatedRule::Type => "type",
            ViolatedRule::Min => "min",
            ViolatedRule::Max => "max",
            ViolatedRule::Length => "length",
            ViolatedRule::Pattern => "pattern",
        }
    }
}

impl fmt::Display for ViolatedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation failure carrying the field and the rule it violated.
#[derive(Debug, Clone, Error)]
#[error("field '{field}' violates '{rule}' rule: expected {expected}, got {actual}")]
pub struct SchemaError {
    /// Field that failed validation
    pub field: String,
    /// Rule that was violated
    pub rule: ViolatedRule,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl SchemaError {
    pub fn new(
        field: impl Into<String>,
        rule: ViolatedRule,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, ViolatedRule::Required, "field to be present", "missing or null")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, ViolatedRule::Type, expected, actual)
    }
}
