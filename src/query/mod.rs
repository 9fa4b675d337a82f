//! Query specification and evaluation.
//!
//! A [`QuerySpec`] is a caller-owned value describing filter, search,
//! order, and pagination intent. It is evaluated by a stateless evaluator,
//! so specs can be built, held, and reused without touching store state.
//! [`QueryBuilder`] layers fluent chaining on top: terminal calls consume
//! the builder, so no condition state survives past them.

mod builder;
mod condition;
pub(crate) mod evaluator;

pub use builder::QueryBuilder;
pub use condition::{
    Condition, Conjunction, Operator, OrderDirection, OrderSpec, QuerySpec, SearchTerm,
};
pub use evaluator::{apply, compare_values, row_matches};
