//! Trigger registry and invocation.
//!
//! Invocation keeps the veto and failure channels distinct:
//! - `Ok(false)` from a callback is a veto and blocks the row
//! - any other `Ok` proceeds
//! - `Err` is a callback failure, reported as [`TriggerOutcome::Failed`];
//!   the caller logs it and proceeds, so triggers cannot abort a mutation
//!   by failing, only by explicitly vetoing

use std::collections::HashMap;
use std::fmt;

use crate::store::Row;

/// Mutation kind passed to trigger callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    /// Returns the operation name as seen by callbacks and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Row snapshots handed to a trigger callback.
///
/// `old` is `None` for inserts, `new` is `None` for deletes; updates carry
/// the stored row and the candidate merged row.
#[derive(Debug, Clone)]
pub struct TriggerContext {
    pub operation: Operation,
    pub old: Option<Row>,
    pub new: Option<Row>,
}

/// A trigger callback.
pub type TriggerFn = Box<dyn Fn(&TriggerContext) -> Result<bool, String>>;

/// Result of invoking one trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Callback allowed the mutation
    Proceed,
    /// Callback returned `false`; the row's mutation is blocked
    Veto,
    /// Callback failed; logged by the caller and treated as proceed
    Failed(String),
}

/// Per-table trigger sets, fired in registration order.
#[derive(Default)]
pub struct TriggerRegistry {
    triggers: HashMap<String, Vec<(String, TriggerFn)>>,
}

impl fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .triggers
            .iter()
            .map(|(table, set)| (table.as_str(), set.len()))
            .collect();
        f.debug_struct("TriggerRegistry").field("counts", &counts).finish()
    }
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the named trigger exists on the table.
    pub fn contains(&self, table: &str, name: &str) -> bool {
        self.triggers
            .get(table)
            .map(|set| set.iter().any(|(n, _)| n == name))
            .unwrap_or(false)
    }

    /// Registers a trigger. The caller checks for duplicates first.
    pub fn add(&mut self, table: &str, name: &str, callback: TriggerFn) {
        self.triggers
            .entry(table.to_string())
            .or_default()
            .push((name.to_string(), callback));
    }

    /// Removes only the named trigger; returns false if it was absent.
    pub fn remove(&mut self, table: &str, name: &str) -> bool {
        let Some(set) = self.triggers.get_mut(table) else {
            return false;
        };
        let before = set.len();
        set.retain(|(n, _)| n != name);
        let removed = set.len() < before;
        if set.is_empty() {
            self.triggers.remove(table);
        }
        removed
    }

    /// Drops every trigger belonging to a table (table drop cascade).
    pub fn remove_table(&mut self, table: &str) {
        self.triggers.remove(table);
    }

    /// Invokes every trigger on the table in registration order.
    ///
    /// All triggers run even after a veto; earlier callbacks' side effects
    /// are never undone.
    pub fn invoke(&self, table: &str, context: &TriggerContext) -> Vec<(String, TriggerOutcome)> {
        let Some(set) = self.triggers.get(table) else {
            return Vec::new();
        };

        set.iter()
            .map(|(name, callback)| {
                let outcome = match callback(context) {
                    Ok(false) => TriggerOutcome::Veto,
                    Ok(_) => TriggerOutcome::Proceed,
                    Err(reason) => TriggerOutcome::Failed(reason),
                };
                (name.clone(), outcome)
            })
            .collect()
    }
}
