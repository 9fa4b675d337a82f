//! Secondary index structures.
//!
//! Indexes are informational groupings rebuilt on demand. No read or
//! write path consults them; they go stale after any mutation and must be
//! rebuilt explicitly by the caller.

mod manager;

pub use manager::{index_key, IndexManager};
