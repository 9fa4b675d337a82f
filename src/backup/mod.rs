//! Whole-store snapshots.
//!
//! A snapshot is a structural copy of table rows and relationship
//! metadata at one instant. Schemas, triggers, and indexes are not part
//! of a snapshot: restoring after dropping a table that carried them
//! loses that metadata permanently.

mod snapshot;

pub use snapshot::{Backup, BackupMetadata, TableSummary};
