//! Stateless query evaluation.
//!
//! Evaluation order is fixed:
//! 1. Soft-delete filter (when enabled), before all spec conditions
//! 2. Where-conditions, ALL combined with AND regardless of conjunction tags
//! 3. Search terms, ANY match passes (OR), case-insensitive substring
//! 4. Stable sort by the order column; equal keys keep prior order
//! 5. Window slice `[offset, offset+limit)`; an offset past the end yields
//!    an empty result, not an error

use std::cmp::Ordering;

use serde_json::Value;

use crate::constants::DELETED_AT;
use crate::schema::stringify;
use crate::store::Row;

use super::condition::{Operator, OrderDirection, QuerySpec};

/// Applies a full spec to a row sequence, returning cloned matches.
pub fn apply(rows: &[Row], spec: &QuerySpec, soft_delete: bool) -> Vec<Row> {
    let mut results: Vec<Row> = rows
        .iter()
        .filter(|row| row_matches(row, spec, soft_delete))
        .cloned()
        .collect();

    if let Some(order) = &spec.order {
        results.sort_by(|a, b| {
            let ordering = compare_values(a.get(&order.column), b.get(&order.column));
            match order.direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        });
    }

    if let Some(limit) = spec.limit {
        let start = spec.offset.min(results.len());
        let end = spec.offset.saturating_add(limit).min(results.len());
        results = results[start..end].to_vec();
    }

    results
}

/// Checks whether one row passes the filter stages (steps 1-3).
///
/// Used both by reads and by the mutation pipeline so updates and deletes
/// match exactly the rows a read would return.
pub fn row_matches(row: &Row, spec: &QuerySpec, soft_delete: bool) -> bool {
    if soft_delete && !is_visible(row) {
        return false;
    }

    let conditions_pass = spec
        .conditions
        .iter()
        .all(|cond| matches_condition(row, &cond.field, cond.operator, &cond.value));

    if !conditions_pass {
        return false;
    }

    if spec.search.is_empty() {
        return true;
    }

    spec.search.iter().any(|term| {
        row.get(&term.field)
            .map(|v| stringify(v).to_lowercase().contains(&term.term.to_lowercase()))
            .unwrap_or(false)
    })
}

/// A row is visible unless its deletion marker is set and non-null.
pub fn is_visible(row: &Row) -> bool {
    match row.get(DELETED_AT) {
        None | Some(Value::Null) => true,
        Some(_) => false,
    }
}

/// Evaluates one condition against one row.
fn matches_condition(row: &Row, field: &str, operator: Operator, expected: &Value) -> bool {
    let actual = match row.get(field) {
        Some(v) if !v.is_null() => v,
        // Missing or null field: only a not-equal test can pass
        _ => return operator == Operator::Neq,
    };

    match operator {
        Operator::Eq => actual == expected,
        Operator::Neq => actual != expected,
        Operator::Gt => ordered_cmp(actual, expected) == Some(Ordering::Greater),
        Operator::Lt => ordered_cmp(actual, expected) == Some(Ordering::Less),
        Operator::Gte => matches!(
            ordered_cmp(actual, expected),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        Operator::Lte => matches!(
            ordered_cmp(actual, expected),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
        Operator::In => expected
            .as_array()
            .map(|set| set.contains(actual))
            .unwrap_or(false),
        Operator::Like => {
            let pattern = match expected.as_str() {
                Some(p) => p.replace('%', ""),
                None => return false,
            };
            stringify(actual).contains(&pattern)
        }
    }
}

/// Ordering comparison for range operators.
///
/// Numbers compare numerically, strings lexicographically; mixed or
/// unsupported types do not compare (no match).
fn ordered_cmp(actual: &Value, bound: &Value) -> Option<Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => {
            let af = a.as_f64()?;
            let bf = b.as_f64()?;
            af.partial_cmp(&bf)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Compares two optional JSON values for sorting.
///
/// Ordering rules:
/// - missing < present
/// - null < bool < number < string < array < object
/// - For same types, natural ordering
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);

            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => Ordering::Equal,
            }
        }
    }
}
