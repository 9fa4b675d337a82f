//! Row validation against a schema.
//!
//! Semantics:
//! - Fields are checked in schema declaration order
//! - Per field: required, then type, then min/max, then length, then pattern
//! - The first violation across the whole batch stops validation
//! - Validation never mutates rows and is deterministic

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ViolatedRule};
use super::types::{FieldType, Schema};
use crate::store::Row;

/// Validates a batch of rows, stopping at the first violation.
pub fn validate_rows(rows: &[Row], schema: &Schema) -> SchemaResult<()> {
    for row in rows {
        validate_row(row, schema)?;
    }
    Ok(())
}

/// Validates a single row against every schema field in declaration order.
pub fn validate_row(row: &Row, schema: &Schema) -> SchemaResult<()> {
    for def in schema.fields() {
        let value = match row.get(&def.name) {
            Some(v) if !v.is_null() => v,
            _ => {
                // Missing or null: only the required rule applies
                if def.required {
                    return Err(SchemaError::missing_field(&def.name));
                }
                continue;
            }
        };

        if let Some(expected) = def.field_type {
            if !type_matches(value, expected) {
                return Err(SchemaError::type_mismatch(
                    &def.name,
                    expected.as_str(),
                    json_type_name(value),
                ));
            }
        }

        if let Some(min) = def.min {
            if let Some(n) = value.as_f64() {
                if n < min {
                    return Err(SchemaError::new(
                        &def.name,
                        ViolatedRule::Min,
                        format!(">= {}", min),
                        n.to_string(),
                    ));
                }
            }
        }

        if let Some(max) = def.max {
            if let Some(n) = value.as_f64() {
                if n > max {
                    return Err(SchemaError::new(
                        &def.name,
                        ViolatedRule::Max,
                        format!("<= {}", max),
                        n.to_string(),
                    ));
                }
            }
        }

        if let Some(length) = def.length {
            let actual = value.as_str().map(|s| s.chars().count());
            if actual != Some(length) {
                return Err(SchemaError::new(
                    &def.name,
                    ViolatedRule::Length,
                    format!("string of length {}", length),
                    match actual {
                        Some(n) => format!("length {}", n),
                        None => json_type_name(value).to_string(),
                    },
                ));
            }
        }

        if let Some(pattern) = &def.pattern {
            let text = stringify(value);
            if !pattern.is_match(&text) {
                return Err(SchemaError::new(
                    &def.name,
                    ViolatedRule::Pattern,
                    format!("match for /{}/", pattern.as_str()),
                    text,
                ));
            }
        }
    }

    Ok(())
}

/// Exact type match — no coercion.
fn type_matches(value: &Value, expected: FieldType) -> bool {
    match expected {
        FieldType::Number => value.is_number(),
        FieldType::String => value.is_string(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Object => value.is_object(),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stringifies a value the way pattern matching sees it.
///
/// Strings are used verbatim (no surrounding quotes); everything else is
/// its JSON text form.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
