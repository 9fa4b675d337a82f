//! Row-level triggers.
//!
//! Triggers are advisory callbacks invoked by the mutation pipeline. A
//! callback blocks a single row's mutation only by returning `Ok(false)`;
//! a callback error is logged and the mutation proceeds.

mod registry;

pub use registry::{
    Operation, TriggerContext, TriggerFn, TriggerOutcome, TriggerRegistry,
};
