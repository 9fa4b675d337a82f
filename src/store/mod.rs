//! The table store aggregate.
//!
//! Owns the table map and every table-scoped registry (schemas,
//! relationships, triggers, indexes), and exposes the CRUD pipeline,
//! aggregation, serialization, and transaction operations.

mod config;
mod errors;
mod mutation;
mod queries;
mod serialize;
#[allow(clippy::module_inception)]
mod store;

pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use queries::{Page, Pagination, StoreStats, TableStats};
pub use store::{RelationKind, Relationship, TableStore};

/// An open field-to-value record.
pub type Row = serde_json::Map<String, serde_json::Value>;
