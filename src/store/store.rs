//! The `TableStore` aggregate: table lifecycle, schemas, relationships,
//! triggers, and indexes.
//!
//! Registries stay separate sub-maps keyed by table name rather than
//! living inside each table: snapshots round-trip only rows and
//! relationships, so schema/trigger/index metadata must survive a restore
//! of row data and die only on explicit table drop. The drop cascade is
//! one operation touching every sub-map.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CREATED_AT, UPDATED_AT};
use crate::index::IndexManager;
use crate::observability::Logger;
use crate::query::{evaluator, QueryBuilder, QuerySpec};
use crate::schema::{validate_rows, Schema};
use crate::trigger::{TriggerFn, TriggerRegistry};

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::Row;

/// Declared relationship kind. Stored as metadata only; `join` never
/// consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsTo,
}

/// A directed relationship edge between two tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub table: String,
    pub related_table: String,
    pub kind: RelationKind,
    pub foreign_key: String,
}

/// In-process, non-persistent record store.
#[derive(Debug)]
pub struct TableStore {
    pub(crate) tables: HashMap<String, Vec<Row>>,
    pub(crate) schemas: HashMap<String, Schema>,
    pub(crate) relationships: Vec<Relationship>,
    pub(crate) triggers: TriggerRegistry,
    pub(crate) indexes: IndexManager,
    pub(crate) logger: Logger,
    pub(crate) timestamps: bool,
    pub(crate) soft_delete: bool,
    pub(crate) last_insert_id: Option<Value>,
    pub(crate) last_error: Option<StoreError>,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl TableStore {
    /// Creates a store with the given options.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            tables: HashMap::new(),
            schemas: HashMap::new(),
            relationships: Vec::new(),
            triggers: TriggerRegistry::new(),
            indexes: IndexManager::new(),
            logger: Logger::new(config.logging),
            timestamps: config.timestamps,
            soft_delete: config.soft_delete,
            last_insert_id: None,
            last_error: None,
        }
    }

    /// Starts a fluent query against this store.
    pub fn query(&mut self) -> QueryBuilder<'_> {
        QueryBuilder::new(self)
    }

    // ------------------------------------------------------------------
    // Table lifecycle
    // ------------------------------------------------------------------

    /// Creates an empty table, recording the schema if given.
    pub fn create_table(&mut self, name: &str, schema: Option<Schema>) -> StoreResult<()> {
        if self.tables.contains_key(name) {
            return Err(StoreError::TableAlreadyExists(name.to_string()));
        }

        self.tables.insert(name.to_string(), Vec::new());
        if let Some(schema) = schema {
            self.schemas.insert(name.to_string(), schema);
        }

        self.logger.info("CREATE_TABLE", &[("table", name)]);
        Ok(())
    }

    /// Drops a table and cascades over every table-scoped registry:
    /// schema, relationships touching the table, triggers, and indexes.
    pub fn drop_table(&mut self, name: &str) -> StoreResult<()> {
        if self.tables.remove(name).is_none() {
            return Err(StoreError::TableNotFound(name.to_string()));
        }

        self.schemas.remove(name);
        self.relationships
            .retain(|rel| rel.table != name && rel.related_table != name);
        self.triggers.remove_table(name);
        self.indexes.remove_table(name);

        self.logger.info("DROP_TABLE", &[("table", name)]);
        Ok(())
    }

    /// Replaces a table's entire row sequence, creating the table if
    /// absent. Rows are validated when a schema is supplied, and the
    /// schema is recorded on success.
    pub fn set_table(
        &mut self,
        name: &str,
        mut rows: Vec<Row>,
        schema: Option<&Schema>,
    ) -> StoreResult<()> {
        if let Some(schema) = schema {
            validate_rows(&rows, schema)?;
        }

        if self.timestamps {
            let now = now();
            for row in &mut rows {
                row.entry(CREATED_AT.to_string())
                    .or_insert_with(|| Value::String(now.clone()));
                row.entry(UPDATED_AT.to_string())
                    .or_insert_with(|| Value::String(now.clone()));
            }
        }

        let count = rows.len().to_string();
        self.tables.insert(name.to_string(), rows);
        if let Some(schema) = schema {
            self.schemas.insert(name.to_string(), schema.clone());
        }

        self.logger.info("SET_TABLE", &[("table", name), ("rows", &count)]);
        Ok(())
    }

    /// True iff the table's visible row count is greater than zero.
    ///
    /// This is a content check, not an existence check: an empty or fully
    /// soft-deleted table reports false.
    pub fn exists(&self, name: &str) -> bool {
        match self.tables.get(name) {
            Some(rows) if self.soft_delete => rows.iter().any(evaluator::is_visible),
            Some(rows) => !rows.is_empty(),
            None => false,
        }
    }

    /// True iff the table itself exists, regardless of contents.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Raw row storage for direct inspection (soft-deleted rows included).
    pub fn rows(&self, table: &str) -> StoreResult<&[Row]> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Adds a column to every row, filling missing fields with `default`.
    pub fn add_column(&mut self, table: &str, column: &str, default: Value) -> StoreResult<()> {
        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for row in rows.iter_mut() {
            row.entry(column.to_string()).or_insert_with(|| default.clone());
        }

        self.logger.info("ADD_COLUMN", &[("table", table), ("column", column)]);
        Ok(())
    }

    /// Removes a column from every row.
    pub fn drop_column(&mut self, table: &str, column: &str) -> StoreResult<()> {
        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        for row in rows.iter_mut() {
            row.remove(column);
        }

        self.logger.info("DROP_COLUMN", &[("table", table), ("column", column)]);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Schemas
    // ------------------------------------------------------------------

    /// Returns the table's schema, if one is attached.
    pub fn schema(&self, table: &str) -> Option<&Schema> {
        self.schemas.get(table)
    }

    /// Replaces a table's schema after re-validating all current rows.
    ///
    /// The new schema is stored only if validation of the existing data
    /// succeeds; a failure leaves the previous schema in place.
    pub fn update_schema(&mut self, table: &str, schema: Schema) -> StoreResult<()> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        validate_rows(rows, &schema)?;
        self.schemas.insert(table.to_string(), schema);

        self.logger.info("UPDATE_SCHEMA", &[("table", table)]);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------

    /// Declares a relationship edge. Metadata only; never enforced.
    pub fn create_relationship(
        &mut self,
        table: &str,
        related_table: &str,
        kind: RelationKind,
        foreign_key: &str,
    ) -> StoreResult<()> {
        if !self.tables.contains_key(table) {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        if !self.tables.contains_key(related_table) {
            return Err(StoreError::TableNotFound(related_table.to_string()));
        }

        self.relationships.push(Relationship {
            table: table.to_string(),
            related_table: related_table.to_string(),
            kind,
            foreign_key: foreign_key.to_string(),
        });

        self.logger.info(
            "CREATE_RELATIONSHIP",
            &[("table", table), ("related_table", related_table)],
        );
        Ok(())
    }

    /// Declared relationships.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    /// Registers a named trigger on a table.
    pub fn create_trigger(
        &mut self,
        table: &str,
        name: &str,
        callback: TriggerFn,
    ) -> StoreResult<()> {
        if !self.tables.contains_key(table) {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        if self.triggers.contains(table, name) {
            return Err(StoreError::TriggerAlreadyExists {
                table: table.to_string(),
                name: name.to_string(),
            });
        }

        self.triggers.add(table, name, callback);
        self.logger.info("CREATE_TRIGGER", &[("table", table), ("trigger", name)]);
        Ok(())
    }

    /// Removes the named trigger only; other triggers on the table stay.
    pub fn drop_trigger(&mut self, table: &str, name: &str) -> StoreResult<()> {
        if !self.tables.contains_key(table) || !self.triggers.remove(table, name) {
            return Err(StoreError::TriggerNotFound {
                table: table.to_string(),
                name: name.to_string(),
            });
        }

        self.logger.info("DROP_TRIGGER", &[("table", table), ("trigger", name)]);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    /// Builds (or rebuilds) a grouping of the table's current rows keyed
    /// by the joined values of `columns`. Returns the index key.
    ///
    /// The grouping is informational only and goes stale after any
    /// mutation until rebuilt.
    pub fn create_index(&mut self, table: &str, columns: &[String]) -> StoreResult<String> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let key = self.indexes.rebuild(table, columns, rows);
        self.logger.info("CREATE_INDEX", &[("index", &key)]);
        Ok(key)
    }

    /// Returns the grouping stored under an index key.
    pub fn index(&self, key: &str) -> Option<&HashMap<String, Vec<Row>>> {
        self.indexes.get(key)
    }

    // ------------------------------------------------------------------
    // State accessors
    // ------------------------------------------------------------------

    /// Id of the most recently inserted row, if any.
    pub fn last_insert_id(&self) -> Option<&Value> {
        self.last_insert_id.as_ref()
    }

    /// Most recent JSON-import or restore failure, if any.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    // ------------------------------------------------------------------
    // Shared internals
    // ------------------------------------------------------------------

    pub(crate) fn require_table(&self, table: &str) -> StoreResult<&Vec<Row>> {
        self.tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    pub(crate) fn matching_rows(&self, table: &str, spec: &QuerySpec) -> StoreResult<Vec<Row>> {
        let rows = self.require_table(table)?;
        Ok(evaluator::apply(rows, spec, self.soft_delete))
    }
}

/// Current time in the RFC 3339 form stamped onto rows.
pub(crate) fn now() -> String {
    Utc::now().to_rfc3339()
}
