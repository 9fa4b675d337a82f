//! Terminal reads: row retrieval, aggregation, pagination, join, stats.
//!
//! Everything here is a derived view over the evaluator; none of these
//! operations mutate store state.

use serde_json::Value;

use crate::query::{compare_values, QuerySpec};

use super::errors::{StoreError, StoreResult};
use super::store::{Relationship, TableStore};
use super::Row;

/// Page math reported alongside one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub per_page: usize,
    pub total_records: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of rows plus its pagination metadata.
#[derive(Debug, Clone)]
pub struct Page {
    pub data: Vec<Row>,
    pub pagination: Pagination,
}

/// Row and column counts for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

/// Derived store statistics. Purely informational, no side effects.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub tables: Vec<TableStats>,
    pub total_records: usize,
    pub indexes: Vec<String>,
    pub relationships: Vec<Relationship>,
}

impl TableStore {
    /// Returns all rows matching the spec.
    pub fn get_with(&self, table: &str, spec: &QuerySpec) -> StoreResult<Vec<Row>> {
        self.matching_rows(table, spec)
    }

    /// Returns the first matching row, if any.
    pub fn get_one_with(&self, table: &str, spec: &QuerySpec) -> StoreResult<Option<Row>> {
        Ok(self.matching_rows(table, spec)?.into_iter().next())
    }

    /// Counts matching rows.
    pub fn count_with(&self, table: &str, spec: &QuerySpec) -> StoreResult<usize> {
        Ok(self.matching_rows(table, spec)?.len())
    }

    /// All visible rows of a table, unconditioned.
    pub fn get(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.get_with(table, &QuerySpec::new())
    }

    /// First visible row of a table, unconditioned.
    pub fn get_one(&self, table: &str) -> StoreResult<Option<Row>> {
        self.get_one_with(table, &QuerySpec::new())
    }

    /// Visible row count of a table, unconditioned.
    pub fn count(&self, table: &str) -> StoreResult<usize> {
        self.count_with(table, &QuerySpec::new())
    }

    /// Sums a numeric field over matching rows. Non-numeric and missing
    /// values contribute nothing.
    pub fn sum_with(&self, table: &str, field: &str, spec: &QuerySpec) -> StoreResult<f64> {
        Ok(self
            .matching_rows(table, spec)?
            .iter()
            .filter_map(|row| row.get(field).and_then(Value::as_f64))
            .sum())
    }

    /// Averages a numeric field over matching rows carrying it; `None`
    /// when no matching row has a numeric value.
    pub fn avg_with(&self, table: &str, field: &str, spec: &QuerySpec) -> StoreResult<Option<f64>> {
        let values: Vec<f64> = self
            .matching_rows(table, spec)?
            .iter()
            .filter_map(|row| row.get(field).and_then(Value::as_f64))
            .collect();

        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    /// Minimum field value over matching rows.
    pub fn min_with(&self, table: &str, field: &str, spec: &QuerySpec) -> StoreResult<Option<Value>> {
        Ok(self
            .matching_rows(table, spec)?
            .iter()
            .filter_map(|row| row.get(field))
            .min_by(|a, b| compare_values(Some(a), Some(b)))
            .cloned())
    }

    /// Maximum field value over matching rows.
    pub fn max_with(&self, table: &str, field: &str, spec: &QuerySpec) -> StoreResult<Option<Value>> {
        Ok(self
            .matching_rows(table, spec)?
            .iter()
            .filter_map(|row| row.get(field))
            .max_by(|a, b| compare_values(Some(a), Some(b)))
            .cloned())
    }

    /// Returns one page of matching rows with page math.
    ///
    /// Pages are 1-based; page 0 is treated as page 1. The spec's own
    /// limit window is ignored — the page is the window.
    pub fn paginate_with(
        &self,
        table: &str,
        page: usize,
        per_page: usize,
        spec: &QuerySpec,
    ) -> StoreResult<Page> {
        if per_page == 0 {
            return Err(StoreError::InvalidInput(
                "per_page must be greater than zero".to_string(),
            ));
        }

        let mut unwindowed = spec.clone();
        unwindowed.limit = None;
        unwindowed.offset = 0;

        let rows = self.matching_rows(table, &unwindowed)?;
        let total_records = rows.len();
        let total_pages = total_records.div_ceil(per_page);
        let current_page = page.max(1);

        let start = (current_page - 1).saturating_mul(per_page).min(total_records);
        let end = start.saturating_add(per_page).min(total_records);

        Ok(Page {
            data: rows[start..end].to_vec(),
            pagination: Pagination {
                current_page,
                per_page,
                total_records,
                total_pages,
                has_next_page: current_page < total_pages,
                has_prev_page: current_page > 1,
            },
        })
    }

    /// First-match equality join.
    ///
    /// For every row of `left`, the first row of `right` whose `right_key`
    /// equals the row's `left_key` is merged in; both sides' fields are
    /// copied under `"{table}.{field}"` names. Rows of `left` with no
    /// match pass through unprefixed and unmerged, so joined results do
    /// NOT have a uniform shape.
    pub fn join(
        &self,
        left: &str,
        right: &str,
        left_key: &str,
        right_key: &str,
    ) -> StoreResult<Vec<Row>> {
        let left_rows = self.require_table(left)?;
        let right_rows = self.require_table(right)?;

        let mut results = Vec::with_capacity(left_rows.len());
        for left_row in left_rows {
            let matched = left_row.get(left_key).and_then(|key| {
                right_rows
                    .iter()
                    .find(|candidate| candidate.get(right_key) == Some(key))
            });

            match matched {
                Some(right_row) => {
                    let mut merged = Row::new();
                    for (field, value) in left_row {
                        merged.insert(format!("{}.{}", left, field), value.clone());
                    }
                    for (field, value) in right_row {
                        merged.insert(format!("{}.{}", right, field), value.clone());
                    }
                    results.push(merged);
                }
                None => results.push(left_row.clone()),
            }
        }

        Ok(results)
    }

    /// Derived statistics over the whole store.
    pub fn stats(&self) -> StoreStats {
        let mut tables: Vec<TableStats> = self
            .tables
            .iter()
            .map(|(name, rows)| TableStats {
                name: name.clone(),
                rows: rows.len(),
                columns: rows.first().map(Row::len).unwrap_or(0),
            })
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let total_records = tables.iter().map(|t| t.rows).sum();

        StoreStats {
            tables,
            total_records,
            indexes: self.indexes.keys(),
            relationships: self.relationships.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OrderDirection;
    use crate::store::{RelationKind, StoreConfig};
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    fn seeded_store() -> TableStore {
        let mut store = TableStore::default();
        store.create_table("users", None).unwrap();
        store.insert("users", row(json!({"id": 1, "name": "Alice", "age": 30}))).unwrap();
        store.insert("users", row(json!({"id": 2, "name": "Bob", "age": 25}))).unwrap();
        store.insert("users", row(json!({"id": 3, "name": "Carol", "age": 25}))).unwrap();
        store
    }

    #[test]
    fn test_get_on_missing_table() {
        let store = TableStore::default();
        assert!(matches!(
            store.get("ghost").unwrap_err(),
            StoreError::TableNotFound(_)
        ));
    }

    #[test]
    fn test_get_one_returns_first_match() {
        let mut store = seeded_store();
        let first = store
            .query()
            .filter("age", json!(25))
            .get_one("users")
            .unwrap()
            .unwrap();
        assert_eq!(first["name"], json!("Bob"));
    }

    #[test]
    fn test_aggregates() {
        let store = seeded_store();
        let spec = QuerySpec::new();

        assert_eq!(store.count_with("users", &spec).unwrap(), 3);
        assert_eq!(store.sum_with("users", "age", &spec).unwrap(), 80.0);
        let avg = store.avg_with("users", "age", &spec).unwrap().unwrap();
        assert!((avg - 80.0 / 3.0).abs() < 1e-9);
        assert_eq!(store.min_with("users", "age", &spec).unwrap(), Some(json!(25)));
        assert_eq!(store.max_with("users", "age", &spec).unwrap(), Some(json!(30)));
    }

    #[test]
    fn test_aggregates_on_empty_match() {
        let store = seeded_store();
        let spec = QuerySpec::new().filter("age", json!(99));

        assert_eq!(store.sum_with("users", "age", &spec).unwrap(), 0.0);
        assert_eq!(store.avg_with("users", "age", &spec).unwrap(), None);
        assert_eq!(store.min_with("users", "age", &spec).unwrap(), None);
    }

    #[test]
    fn test_paginate_page_math() {
        let store = seeded_store();
        let page = store
            .paginate_with("users", 1, 2, &QuerySpec::new())
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.total_records, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_next_page);
        assert!(!page.pagination.has_prev_page);

        let last = store
            .paginate_with("users", 2, 2, &QuerySpec::new())
            .unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.pagination.has_next_page);
        assert!(last.pagination.has_prev_page);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let store = seeded_store();
        let page = store
            .paginate_with("users", 9, 2, &QuerySpec::new())
            .unwrap();
        assert!(page.data.is_empty());
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_paginate_rejects_zero_per_page() {
        let store = seeded_store();
        assert!(matches!(
            store.paginate_with("users", 1, 0, &QuerySpec::new()).unwrap_err(),
            StoreError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_paginate_respects_conditions_and_order() {
        let mut store = seeded_store();
        let page = store
            .query()
            .filter("age", json!(25))
            .order_by("name", OrderDirection::Desc)
            .paginate("users", 1, 1)
            .unwrap();

        assert_eq!(page.data[0]["name"], json!("Carol"));
        assert_eq!(page.pagination.total_records, 2);
    }

    #[test]
    fn test_join_prefixes_matched_rows() {
        let mut store = seeded_store();
        store.create_table("posts", None).unwrap();
        store
            .insert("posts", row(json!({"id": 1, "user_id": 1, "title": "hello"})))
            .unwrap();

        let joined = store.join("posts", "users", "user_id", "id").unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0]["posts.title"], json!("hello"));
        assert_eq!(joined[0]["users.name"], json!("Alice"));
    }

    #[test]
    fn test_join_first_match_wins() {
        let mut store = TableStore::default();
        store.create_table("posts", None).unwrap();
        store.create_table("users", None).unwrap();
        store.insert("posts", row(json!({"user_id": 7}))).unwrap();
        store.insert("users", row(json!({"id": 7, "name": "first"}))).unwrap();
        store.insert("users", row(json!({"id": 7, "name": "second"}))).unwrap();

        let joined = store.join("posts", "users", "user_id", "id").unwrap();
        assert_eq!(joined[0]["users.name"], json!("first"));
    }

    #[test]
    fn test_join_unmatched_rows_pass_through_unprefixed() {
        let mut store = seeded_store();
        store.create_table("posts", None).unwrap();
        store
            .insert("posts", row(json!({"id": 1, "user_id": 99, "title": "orphan"})))
            .unwrap();

        let joined = store.join("posts", "users", "user_id", "id").unwrap();
        assert_eq!(joined.len(), 1);
        // Unmatched: original shape, no prefixes
        assert_eq!(joined[0]["title"], json!("orphan"));
        assert!(!joined[0].contains_key("posts.title"));
    }

    #[test]
    fn test_stats() {
        let mut store = seeded_store();
        store.create_table("posts", None).unwrap();
        store.create_index("users", &["age".to_string()]).unwrap();
        store
            .create_relationship("posts", "users", RelationKind::BelongsTo, "user_id")
            .unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_records, 3);
        assert_eq!(
            stats.tables,
            vec![
                TableStats { name: "posts".to_string(), rows: 0, columns: 0 },
                TableStats { name: "users".to_string(), rows: 3, columns: 3 },
            ]
        );
        assert_eq!(stats.indexes, vec!["users:age".to_string()]);
        assert_eq!(stats.relationships.len(), 1);
    }

    #[test]
    fn test_soft_deleted_rows_hidden_from_reads_and_counts() {
        let mut store = TableStore::new(StoreConfig::new().soft_delete(true));
        store.create_table("users", None).unwrap();
        store.insert("users", row(json!({"id": 1, "age": 30}))).unwrap();
        store.insert("users", row(json!({"id": 2, "age": 40}))).unwrap();

        store
            .query()
            .filter("id", json!(1))
            .delete("users")
            .unwrap();

        assert_eq!(store.count("users").unwrap(), 1);
        assert_eq!(store.sum_with("users", "age", &QuerySpec::new()).unwrap(), 40.0);
        // Direct inspection still sees the marked row
        assert_eq!(store.rows("users").unwrap().len(), 2);
    }
}
