//! Query condition structures.

use serde_json::Value;

use crate::constants::operators;

/// Comparison operators for where-conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equality (the default)
    Eq,
    /// Greater than
    Gt,
    /// Less than
    Lt,
    /// Greater than or equal
    Gte,
    /// Less than or equal
    Lte,
    /// Not equal
    Neq,
    /// Substring containment after stripping `%` markers, case-sensitive
    Like,
    /// Membership in a given set
    In,
}

impl Operator {
    /// Returns the symbolic operator string.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => operators::EQ,
            Operator::Gt => operators::GT,
            Operator::Lt => operators::LT,
            Operator::Gte => operators::GTE,
            Operator::Lte => operators::LTE,
            Operator::Neq => operators::NEQ,
            Operator::Like => operators::LIKE,
            Operator::In => operators::IN,
        }
    }

    /// Parses a symbolic operator string.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            operators::EQ => Some(Operator::Eq),
            operators::GT => Some(Operator::Gt),
            operators::LT => Some(Operator::Lt),
            operators::GTE => Some(Operator::Gte),
            operators::LTE => Some(Operator::Lte),
            operators::NEQ => Some(Operator::Neq),
            operators::LIKE => Some(Operator::Like),
            operators::IN => Some(Operator::In),
            _ => None,
        }
    }
}

/// Boolean conjunction tag recorded per condition.
///
/// The evaluator combines ALL conditions with AND regardless of this tag;
/// `Or` is recorded but deliberately never consulted, matching the
/// documented behavior of the query surface. Tests pin this down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

/// A single where-condition.
#[derive(Debug, Clone)]
pub struct Condition {
    /// Field name
    pub field: String,
    /// Comparison operator
    pub operator: Operator,
    /// Comparison value
    pub value: Value,
    /// Conjunction tag (see [`Conjunction`])
    pub conjunction: Conjunction,
}

/// A case-insensitive substring search over one field.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    pub field: String,
    pub term: String,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Sort specification
#[derive(Debug, Clone)]
pub struct OrderSpec {
    pub column: String,
    pub direction: OrderDirection,
}

/// A complete, caller-owned query specification.
///
/// Builder methods consume and return `self` so specs can be assembled
/// with chained calls and passed to any evaluating operation.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// Where-conditions, combined with AND
    pub conditions: Vec<Condition>,
    /// Search terms, combined with OR
    pub search: Vec<SearchTerm>,
    /// Optional stable sort
    pub order: Option<OrderSpec>,
    /// Maximum number of rows returned
    pub limit: Option<usize>,
    /// Rows skipped before the limit window
    pub offset: usize,
}

impl QuerySpec {
    /// Creates an empty specification matching every visible row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    pub fn filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator: Operator::Eq,
            value,
            conjunction: Conjunction::And,
        });
        self
    }

    /// Adds an equality condition tagged `Or`.
    ///
    /// The tag is recorded only; evaluation still ANDs every condition.
    pub fn or_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator: Operator::Eq,
            value,
            conjunction: Conjunction::Or,
        });
        self
    }

    /// Adds a membership condition.
    pub fn filter_in(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator: Operator::In,
            value: Value::Array(values),
            conjunction: Conjunction::And,
        });
        self
    }

    /// Adds a LIKE condition (`%` markers are stripped before matching).
    pub fn filter_like(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator: Operator::Like,
            value: Value::String(pattern.into()),
            conjunction: Conjunction::And,
        });
        self
    }

    /// Adds a condition with an explicit operator.
    pub fn filter_op(mut self, field: impl Into<String>, operator: Operator, value: Value) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator,
            value,
            conjunction: Conjunction::And,
        });
        self
    }

    /// Adds a case-insensitive search term over one field.
    pub fn search(mut self, field: impl Into<String>, term: impl Into<String>) -> Self {
        self.search.push(SearchTerm {
            field: field.into(),
            term: term.into(),
        });
        self
    }

    /// Sets the sort column and direction.
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order = Some(OrderSpec {
            column: column.into(),
            direction,
        });
        self
    }

    /// Sets the pagination window.
    pub fn limit(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// Returns true if no filtering, search, order, or window is set.
    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
            && self.search.is_empty()
            && self.order.is_none()
            && self.limit.is_none()
            && self.offset == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_symbols_round_trip() {
        for op in [
            Operator::Eq,
            Operator::Gt,
            Operator::Lt,
            Operator::Gte,
            Operator::Lte,
            Operator::Neq,
            Operator::Like,
            Operator::In,
        ] {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol("<>"), None);
    }

    #[test]
    fn test_spec_accumulates_conditions() {
        let spec = QuerySpec::new()
            .filter("age", json!(25))
            .or_filter("name", json!("Jane"))
            .filter_op("score", Operator::Gte, json!(10));

        assert_eq!(spec.conditions.len(), 3);
        assert_eq!(spec.conditions[0].conjunction, Conjunction::And);
        assert_eq!(spec.conditions[1].conjunction, Conjunction::Or);
        assert_eq!(spec.conditions[2].operator, Operator::Gte);
    }

    #[test]
    fn test_unconstrained_spec() {
        assert!(QuerySpec::new().is_unconstrained());
        assert!(!QuerySpec::new().filter("a", json!(1)).is_unconstrained());
        assert!(!QuerySpec::new().limit(10, 0).is_unconstrained());
    }
}
