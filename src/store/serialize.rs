//! Snapshots, restore, transactions, and single-table JSON import/export.

use serde_json::Value;

use crate::backup::Backup;

use super::errors::{StoreError, StoreResult};
use super::store::{now, TableStore};
use super::Row;

impl TableStore {
    /// Captures a structural copy of all tables and relationships.
    ///
    /// Schemas, triggers, and indexes are NOT part of a snapshot.
    pub fn backup(&self) -> Backup {
        Backup::capture(&self.tables, &self.relationships, now())
    }

    /// Restores tables and relationships from a deserialized snapshot.
    ///
    /// A malformed structure raises `RestoreError` and is recorded as the
    /// last error; the store is left untouched in that case.
    pub fn restore(&mut self, snapshot: &Value) -> StoreResult<()> {
        let backup = match Backup::from_value(snapshot) {
            Ok(backup) => backup,
            Err(reason) => {
                let err = StoreError::Restore(reason);
                self.logger.error("RESTORE_FAILED", &[("reason", &err.to_string())]);
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        self.apply_backup(backup);
        self.logger.info("RESTORE", &[]);
        Ok(())
    }

    /// Replaces table and relationship state from a typed snapshot.
    pub(crate) fn apply_backup(&mut self, backup: Backup) {
        self.tables = backup.data;
        self.relationships = backup.metadata.relationships;
    }

    /// Runs `f` with all-or-nothing semantics.
    ///
    /// A snapshot is taken on entry; if the callback fails, tables and
    /// relationships are restored from it before the error is returned.
    /// Whole-store granularity, no nesting: a nested call rolls back to
    /// its own entry snapshot, discarding the outer call's isolation.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let snapshot = self.backup();

        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.apply_backup(snapshot);
                self.logger.warn("TRANSACTION_ROLLBACK", &[]);
                Err(err)
            }
        }
    }

    /// Encodes a table's rows as JSON text.
    pub fn to_json(&self, table: &str) -> StoreResult<String> {
        let rows = self.require_table(table)?;
        serde_json::to_string(rows).map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Decodes JSON text into a table's rows, creating the table if
    /// absent and replacing its contents otherwise.
    ///
    /// Malformed text raises `ParseError` and is recorded as the last
    /// error. Well-formed JSON that is not an array of objects raises
    /// `InvalidInput` instead and is not retained.
    pub fn from_json(&mut self, table: &str, text: &str) -> StoreResult<()> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(reason) => {
                let err = StoreError::Parse(reason.to_string());
                self.logger.error(
                    "IMPORT_FAILED",
                    &[("table", table), ("reason", &err.to_string())],
                );
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        let rows: Vec<Row> = serde_json::from_value(value).map_err(|reason| {
            let err = StoreError::InvalidInput(format!(
                "expected an array of row objects: {}",
                reason
            ));
            self.logger.error(
                "IMPORT_FAILED",
                &[("table", table), ("reason", &err.to_string())],
            );
            err
        })?;

        let count = rows.len().to_string();
        self.tables.insert(table.to_string(), rows);
        self.logger.info("IMPORT", &[("table", table), ("rows", &count)]);
        Ok(())
    }
}
