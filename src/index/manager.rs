//! Index manager maintaining composite-key row groupings.
//!
//! An index is stored under `"{table}:{col1,col2,...}"` and maps the
//! joined column values of each row to the rows carrying them. Each
//! rebuild replaces the grouping wholesale from the rows passed in.

use std::collections::HashMap;

use crate::schema::stringify;
use crate::store::Row;

/// Separator between column values inside a composite key.
const KEY_SEPARATOR: &str = "|";

/// Returns the storage key identifying a (table, column-set) index.
pub fn index_key(table: &str, columns: &[String]) -> String {
    format!("{}:{}", table, columns.join(","))
}

/// Owns every index grouping in the store.
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: HashMap<String, HashMap<String, Vec<Row>>>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index for (table, columns) from the current rows.
    ///
    /// Missing columns contribute an empty string to the composite key,
    /// so rows lacking a column still group deterministically.
    pub fn rebuild(&mut self, table: &str, columns: &[String], rows: &[Row]) -> String {
        let key = index_key(table, columns);

        let mut grouping: HashMap<String, Vec<Row>> = HashMap::new();
        for row in rows {
            let composite = columns
                .iter()
                .map(|col| row.get(col).map(stringify).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(KEY_SEPARATOR);
            grouping.entry(composite).or_default().push(row.clone());
        }

        self.indexes.insert(key.clone(), grouping);
        key
    }

    /// Returns the grouping stored under an index key.
    pub fn get(&self, key: &str) -> Option<&HashMap<String, Vec<Row>>> {
        self.indexes.get(key)
    }

    /// Drops every index belonging to a table (table drop cascade).
    pub fn remove_table(&mut self, table: &str) {
        let prefix = format!("{}:", table);
        self.indexes.retain(|key, _| !key.starts_with(&prefix));
    }

    /// Known index keys, sorted for deterministic reporting.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.indexes.keys().cloned().collect();
        keys.sort();
        keys
    }
}
