//! # Store Errors
//!
//! Error types for store operations. All failures are raised
//! synchronously to the immediate caller; there is no internal retry.
//! The one asymmetry is trigger callbacks: their failures are logged and
//! swallowed by the mutation pipeline so triggers stay advisory.

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Table name already taken
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Named table does not exist
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Trigger name already taken on the table
    #[error("trigger '{name}' already exists on table '{table}'")]
    TriggerAlreadyExists { table: String, name: String },

    /// Table or trigger entry absent on drop
    #[error("trigger '{name}' not found on table '{table}'")]
    TriggerNotFound { table: String, name: String },

    /// Wrong shape passed to an operation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A row violated the table's schema
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Malformed JSON on single-table import
    #[error("parse error: {0}")]
    Parse(String),

    /// Malformed backup structure on restore
    #[error("restore error: {0}")]
    Restore(String),
}

impl StoreError {
    /// Returns true for the failure kinds retained as "last error"
    /// (JSON import and restore failures only).
    pub fn is_retained(&self) -> bool {
        matches!(self, StoreError::Parse(_) | StoreError::Restore(_))
    }
}
