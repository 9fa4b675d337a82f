//! The mutation pipeline: insert, bulk insert, update, delete, truncate.
//!
//! Pipeline order for a single row:
//! 1. Table existence check
//! 2. Auto-increment id assignment and timestamp stamping
//! 3. Schema validation (when a schema is attached)
//! 4. Trigger invocation; a veto skips the row, a callback failure is
//!    logged and the mutation proceeds
//! 5. The row mutation itself

use serde_json::Value;

use crate::constants::{AUTO_INCREMENT, CREATED_AT, DELETED_AT, ID, UPDATED_AT};
use crate::observability::Logger;
use crate::query::{evaluator, QuerySpec};
use crate::schema::validate_row;
use crate::trigger::{Operation, TriggerContext, TriggerOutcome};

use super::errors::{StoreError, StoreResult};
use super::store::{now, TableStore};
use super::Row;

impl TableStore {
    /// Inserts one row, returning the stored row or `None` when a trigger
    /// vetoed the insert.
    pub fn insert(&mut self, table: &str, mut row: Row) -> StoreResult<Option<Row>> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        // Replace the auto-increment sentinel before validation so the
        // schema sees the final id value
        if row.get(ID) == Some(&Value::String(AUTO_INCREMENT.to_string())) {
            let next = rows
                .iter()
                .filter_map(|r| r.get(ID).and_then(Value::as_i64))
                .fold(0, i64::max)
                + 1;
            row.insert(ID.to_string(), Value::from(next));
        }

        if self.timestamps {
            let stamp = now();
            row.entry(CREATED_AT.to_string())
                .or_insert_with(|| Value::String(stamp.clone()));
            row.entry(UPDATED_AT.to_string())
                .or_insert_with(|| Value::String(stamp));
        }

        if let Some(schema) = self.schemas.get(table) {
            validate_row(&row, schema)?;
        }

        let context = TriggerContext {
            operation: Operation::Insert,
            old: None,
            new: Some(row.clone()),
        };
        let outcomes = self.triggers.invoke(table, &context);
        if report_outcomes(&self.logger, table, Operation::Insert, &outcomes) {
            self.logger.info("INSERT_VETOED", &[("table", table)]);
            return Ok(None);
        }

        self.last_insert_id = row.get(ID).cloned();
        self.logger.info("INSERT", &[("table", table)]);

        // Existence was checked above; the insert itself cannot fail
        if let Some(rows) = self.tables.get_mut(table) {
            rows.push(row.clone());
        }
        Ok(Some(row))
    }

    /// Inserts rows in sequence. NOT atomic: a later failure leaves
    /// earlier inserts in place. Returns the number of rows appended.
    pub fn bulk_insert(&mut self, table: &str, rows: Vec<Row>) -> StoreResult<usize> {
        let mut appended = 0;
        for row in rows {
            if self.insert(table, row)?.is_some() {
                appended += 1;
            }
        }
        Ok(appended)
    }

    /// Merges `patch` into every row matching `spec`, skipping vetoed
    /// rows. Returns the number of rows replaced.
    pub fn update_with(&mut self, table: &str, patch: Row, spec: &QuerySpec) -> StoreResult<usize> {
        let soft_delete = self.soft_delete;
        let stamp = self.timestamps.then(now);

        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let mut affected = 0;
        for row in rows.iter_mut() {
            if !evaluator::row_matches(row, spec, soft_delete) {
                continue;
            }

            let mut merged = row.clone();
            for (field, value) in &patch {
                merged.insert(field.clone(), value.clone());
            }
            if let Some(stamp) = &stamp {
                merged.insert(UPDATED_AT.to_string(), Value::String(stamp.clone()));
            }

            let context = TriggerContext {
                operation: Operation::Update,
                old: Some(row.clone()),
                new: Some(merged.clone()),
            };
            let outcomes = self.triggers.invoke(table, &context);
            if report_outcomes(&self.logger, table, Operation::Update, &outcomes) {
                continue;
            }

            *row = merged;
            affected += 1;
        }

        self.logger
            .info("UPDATE", &[("table", table), ("affected", &affected.to_string())]);
        Ok(affected)
    }

    /// Deletes every row matching `spec`, skipping vetoed rows. With soft
    /// delete enabled, rows are stamped with a deletion marker instead of
    /// being removed. Returns the number of rows affected.
    pub fn delete_with(&mut self, table: &str, spec: &QuerySpec) -> StoreResult<usize> {
        let soft_delete = self.soft_delete;
        let stamp = now();

        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let mut affected = 0;

        if soft_delete {
            for row in rows.iter_mut() {
                if !evaluator::row_matches(row, spec, soft_delete) {
                    continue;
                }

                let context = TriggerContext {
                    operation: Operation::Delete,
                    old: Some(row.clone()),
                    new: None,
                };
                let outcomes = self.triggers.invoke(table, &context);
                if report_outcomes(&self.logger, table, Operation::Delete, &outcomes) {
                    continue;
                }

                row.insert(DELETED_AT.to_string(), Value::String(stamp.clone()));
                affected += 1;
            }
        } else {
            let mut kept = Vec::with_capacity(rows.len());
            for row in rows.drain(..) {
                if !evaluator::row_matches(&row, spec, soft_delete) {
                    kept.push(row);
                    continue;
                }

                let context = TriggerContext {
                    operation: Operation::Delete,
                    old: Some(row.clone()),
                    new: None,
                };
                let outcomes = self.triggers.invoke(table, &context);
                if report_outcomes(&self.logger, table, Operation::Delete, &outcomes) {
                    kept.push(row);
                    continue;
                }

                affected += 1;
            }
            *rows = kept;
        }

        self.logger
            .info("DELETE", &[("table", table), ("affected", &affected.to_string())]);
        Ok(affected)
    }

    /// Empties a table's row sequence, bypassing triggers, conditions,
    /// and soft delete.
    pub fn truncate(&mut self, table: &str) -> StoreResult<()> {
        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        rows.clear();
        self.logger.info("TRUNCATE", &[("table", table)]);
        Ok(())
    }
}

/// Logs failed trigger callbacks and reports whether any trigger vetoed.
///
/// `Failed` outcomes are warnings only: the mutation proceeds unless a
/// callback explicitly returned a veto.
fn report_outcomes(
    logger: &Logger,
    table: &str,
    operation: Operation,
    outcomes: &[(String, TriggerOutcome)],
) -> bool {
    let mut vetoed = false;
    for (name, outcome) in outcomes {
        match outcome {
            TriggerOutcome::Proceed => {}
            TriggerOutcome::Veto => vetoed = true,
            TriggerOutcome::Failed(reason) => {
                logger.warn(
                    "TRIGGER_FAILED",
                    &[
                        ("table", table),
                        ("trigger", name),
                        ("operation", operation.as_str()),
                        ("reason", reason),
                    ],
                );
            }
        }
    }
    vetoed
}
