//! Snapshot value types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Relationship, Row};

/// Per-table summary recorded in snapshot metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub count: usize,
}

/// Snapshot metadata: table summaries and relationship declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupMetadata {
    #[serde(default)]
    pub tables: Vec<TableSummary>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// A full structural copy of the store's tables and relationships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    /// RFC 3339 capture time
    #[serde(default)]
    pub timestamp: String,
    /// Table name to row sequence
    pub data: HashMap<String, Vec<Row>>,
    #[serde(default)]
    pub metadata: BackupMetadata,
}

impl Backup {
    /// Captures a snapshot from raw table and relationship state.
    pub fn capture(
        tables: &HashMap<String, Vec<Row>>,
        relationships: &[Relationship],
        timestamp: String,
    ) -> Self {
        let mut summaries: Vec<TableSummary> = tables
            .iter()
            .map(|(name, rows)| TableSummary {
                name: name.clone(),
                count: rows.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            timestamp,
            data: tables.clone(),
            metadata: BackupMetadata {
                tables: summaries,
                relationships: relationships.to_vec(),
            },
        }
    }

    /// Decodes a snapshot from a deserialized JSON value.
    ///
    /// Any structural mismatch (missing `data`, non-array table contents,
    /// non-object rows) is reported as an error string for the caller to
    /// wrap.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }
}
