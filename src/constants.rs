//! Reserved values and operator names exposed to callers.

/// Sentinel id value replaced by the next integer id on insert.
pub const AUTO_INCREMENT: &str = "AUTO_INCREMENT";

/// Field stamped on insert when timestamps are enabled.
pub const CREATED_AT: &str = "created_at";

/// Field refreshed on update when timestamps are enabled.
pub const UPDATED_AT: &str = "updated_at";

/// Soft-delete marker field.
pub const DELETED_AT: &str = "deleted_at";

/// Auto-increment target field.
pub const ID: &str = "id";

/// Named comparison operators and their symbolic forms.
///
/// Exposed so callers can build conditions from configuration or user
/// input without hard-coding operator strings.
pub mod operators {
    pub const EQ: &str = "=";
    pub const GT: &str = ">";
    pub const LT: &str = "<";
    pub const GTE: &str = ">=";
    pub const LTE: &str = "<=";
    pub const NEQ: &str = "!=";
    pub const LIKE: &str = "LIKE";
    pub const IN: &str = "IN";
}
