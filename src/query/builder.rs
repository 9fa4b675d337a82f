//! Fluent query building over a borrowed store.
//!
//! Every terminal method consumes the builder, so a chain is always a
//! complete build → terminal sequence; leftover condition state cannot be
//! observed by, or leak into, another caller's query.

use serde_json::Value;

use crate::store::{Page, Row, StoreResult, TableStore};

use super::condition::{Operator, OrderDirection, QuerySpec};

/// A query under construction against one store.
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    store: &'a mut TableStore,
    spec: QuerySpec,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(store: &'a mut TableStore) -> Self {
        Self {
            store,
            spec: QuerySpec::new(),
        }
    }

    /// Adds an equality condition.
    pub fn filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.spec = self.spec.filter(field, value);
        self
    }

    /// Adds an equality condition tagged `Or`.
    ///
    /// The tag is recorded only; evaluation ANDs every condition.
    pub fn or_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.spec = self.spec.or_filter(field, value);
        self
    }

    /// Adds a membership condition.
    pub fn filter_in(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.spec = self.spec.filter_in(field, values);
        self
    }

    /// Adds a LIKE condition.
    pub fn filter_like(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.spec = self.spec.filter_like(field, pattern);
        self
    }

    /// Adds a condition with an explicit operator.
    pub fn filter_op(mut self, field: impl Into<String>, operator: Operator, value: Value) -> Self {
        self.spec = self.spec.filter_op(field, operator, value);
        self
    }

    /// Adds a case-insensitive search term.
    pub fn search(mut self, field: impl Into<String>, term: impl Into<String>) -> Self {
        self.spec = self.spec.search(field, term);
        self
    }

    /// Sets the sort column and direction.
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.spec = self.spec.order_by(column, direction);
        self
    }

    /// Sets the pagination window.
    pub fn limit(mut self, limit: usize, offset: usize) -> Self {
        self.spec = self.spec.limit(limit, offset);
        self
    }

    /// Returns the accumulated spec without running a query.
    pub fn into_spec(self) -> QuerySpec {
        self.spec
    }

    // Terminal reads

    /// Returns all matching rows.
    pub fn get(self, table: &str) -> StoreResult<Vec<Row>> {
        self.store.get_with(table, &self.spec)
    }

    /// Returns the first matching row, if any.
    pub fn get_one(self, table: &str) -> StoreResult<Option<Row>> {
        self.store.get_one_with(table, &self.spec)
    }

    /// Counts matching rows.
    pub fn count(self, table: &str) -> StoreResult<usize> {
        self.store.count_with(table, &self.spec)
    }

    /// Sums a numeric field over matching rows.
    pub fn sum(self, table: &str, field: &str) -> StoreResult<f64> {
        self.store.sum_with(table, field, &self.spec)
    }

    /// Averages a numeric field over matching rows; `None` when no rows match.
    pub fn avg(self, table: &str, field: &str) -> StoreResult<Option<f64>> {
        self.store.avg_with(table, field, &self.spec)
    }

    /// Minimum field value over matching rows.
    pub fn min(self, table: &str, field: &str) -> StoreResult<Option<Value>> {
        self.store.min_with(table, field, &self.spec)
    }

    /// Maximum field value over matching rows.
    pub fn max(self, table: &str, field: &str) -> StoreResult<Option<Value>> {
        self.store.max_with(table, field, &self.spec)
    }

    /// Returns one page of matches with page math.
    pub fn paginate(self, table: &str, page: usize, per_page: usize) -> StoreResult<Page> {
        self.store.paginate_with(table, page, per_page, &self.spec)
    }

    // Terminal writes

    /// Merges `patch` into every matching, non-vetoed row.
    pub fn update(self, table: &str, patch: Row) -> StoreResult<usize> {
        self.store.update_with(table, patch, &self.spec)
    }

    /// Deletes (or soft-deletes) every matching, non-vetoed row.
    pub fn delete(self, table: &str) -> StoreResult<usize> {
        self.store.delete_with(table, &self.spec)
    }
}
