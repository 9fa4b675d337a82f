//! tabledb - an in-process, non-persistent table store
//!
//! Named tables of ordered JSON rows, a fluent query builder, optional
//! schema enforcement, row-level triggers, soft deletion, and
//! snapshot-based transactions.

pub mod backup;
pub mod constants;
pub mod index;
pub mod observability;
pub mod query;
pub mod schema;
pub mod store;
pub mod trigger;

pub use query::{Operator, OrderDirection, QuerySpec};
pub use schema::{FieldDef, FieldType, Schema};
pub use store::{Row, StoreConfig, StoreError, StoreResult, TableStore};
pub use trigger::{Operation, TriggerContext};
