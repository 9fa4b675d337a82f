//! Schema definition and row validation.
//!
//! Schemas are advisory: they are enforced at insert, bulk insert,
//! explicit table replacement, and explicit schema update — never
//! re-checked on reads.

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, ViolatedRule};
pub use types::{FieldDef, FieldType, Schema};
pub use validator::{validate_row, validate_rows};

pub(crate) use validator::stringify;
