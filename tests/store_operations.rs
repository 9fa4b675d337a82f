//! Store Operation Tests
//!
//! Tests for the table lifecycle and mutation surface:
//! - Table create/drop/replace and the drop cascade
//! - Insert with id auto-increment and timestamp stamping
//! - Soft deletion visibility
//! - Column add/drop
//! - Trigger veto and removal
//! - Relationship and index registration

use serde_json::{json, Value};
use tabledb::store::RelationKind;
use tabledb::{
    Operation, Row, StoreConfig, StoreError, TableStore, TriggerContext,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn row(value: Value) -> Row {
    value.as_object().expect("row literal must be an object").clone()
}

fn seeded() -> TableStore {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();
    store
        .insert("users", row(json!({"id": 1, "name": "Alice", "age": 30})))
        .unwrap();
    store
        .insert("users", row(json!({"id": 2, "name": "Bob", "age": 25})))
        .unwrap();
    store
}

// =============================================================================
// Table Lifecycle Tests
// =============================================================================

#[test]
fn test_create_table_rejects_duplicate_name() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();

    let err = store.create_table("users", None).unwrap_err();
    assert!(matches!(err, StoreError::TableAlreadyExists(_)));
}

#[test]
fn test_drop_table_cascades_registered_metadata() {
    let mut store = seeded();
    store.create_table("posts", None).unwrap();
    store
        .create_relationship("posts", "users", RelationKind::BelongsTo, "user_id")
        .unwrap();
    store
        .create_trigger("users", "audit", Box::new(|_| Ok(true)))
        .unwrap();
    let key = store.create_index("users", &["name".to_string()]).unwrap();

    store.drop_table("users").unwrap();

    assert!(!store.has_table("users"));
    // Relationships touching the dropped table are gone from both sides.
    assert!(store.relationships().is_empty());
    // Re-creating the table starts with no triggers or indexes.
    store.create_table("users", None).unwrap();
    let err = store.drop_trigger("users", "audit").unwrap_err();
    assert!(matches!(err, StoreError::TriggerNotFound { .. }));
    assert!(store.index(&key).is_none());
}

#[test]
fn test_set_table_replaces_rows_wholesale() {
    let mut store = seeded();

    store
        .set_table("users", vec![row(json!({"id": 10, "name": "Zoe"}))], None)
        .unwrap();

    assert_eq!(store.rows("users").unwrap().len(), 1);
    assert_eq!(store.rows("users").unwrap()[0]["id"], json!(10));
}

#[test]
fn test_set_table_creates_missing_table() {
    let mut store = TableStore::default();
    store
        .set_table("fresh", vec![row(json!({"id": 1}))], None)
        .unwrap();
    assert!(store.has_table("fresh"));
}

#[test]
fn test_table_names_sorted() {
    let mut store = TableStore::default();
    store.create_table("zebras", None).unwrap();
    store.create_table("apples", None).unwrap();
    store.create_table("mangos", None).unwrap();

    assert_eq!(store.table_names(), vec!["apples", "mangos", "zebras"]);
}

#[test]
fn test_operations_on_missing_table_fail() {
    let mut store = TableStore::default();

    assert!(matches!(
        store.drop_table("ghost").unwrap_err(),
        StoreError::TableNotFound(_)
    ));
    assert!(matches!(
        store.insert("ghost", row(json!({"id": 1}))).unwrap_err(),
        StoreError::TableNotFound(_)
    ));
    assert!(matches!(
        store.query().get("ghost").unwrap_err(),
        StoreError::TableNotFound(_)
    ));
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_auto_increment_assigns_next_integer_id() {
    let mut store = seeded();

    store
        .insert("users", row(json!({"id": "AUTO_INCREMENT", "name": "Cara"})))
        .unwrap();

    assert_eq!(store.last_insert_id(), Some(&json!(3)));
    let rows = store.rows("users").unwrap();
    assert_eq!(rows[2]["id"], json!(3));
}

#[test]
fn test_auto_increment_on_empty_table_starts_at_one() {
    let mut store = TableStore::default();
    store.create_table("events", None).unwrap();

    store
        .insert("events", row(json!({"id": "AUTO_INCREMENT"})))
        .unwrap();

    assert_eq!(store.last_insert_id(), Some(&json!(1)));
}

#[test]
fn test_auto_increment_ignores_non_integer_ids() {
    let mut store = TableStore::default();
    store.create_table("events", None).unwrap();
    store
        .insert("events", row(json!({"id": "abc"})))
        .unwrap();
    store
        .insert("events", row(json!({"id": 7})))
        .unwrap();

    store
        .insert("events", row(json!({"id": "AUTO_INCREMENT"})))
        .unwrap();

    assert_eq!(store.last_insert_id(), Some(&json!(8)));
}

#[test]
fn test_timestamps_stamped_when_enabled() {
    let mut store = TableStore::new(StoreConfig::new().timestamps(true));
    store.create_table("users", None).unwrap();

    store.insert("users", row(json!({"id": 1}))).unwrap();

    let inserted = &store.rows("users").unwrap()[0];
    assert!(inserted.contains_key("created_at"));
    assert!(inserted.contains_key("updated_at"));
}

#[test]
fn test_caller_supplied_timestamps_preserved() {
    let mut store = TableStore::new(StoreConfig::new().timestamps(true));
    store.create_table("users", None).unwrap();

    store
        .insert("users", row(json!({"id": 1, "created_at": "then"})))
        .unwrap();

    assert_eq!(store.rows("users").unwrap()[0]["created_at"], json!("then"));
}

#[test]
fn test_bulk_insert_reports_inserted_count() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();

    let count = store
        .bulk_insert(
            "users",
            vec![row(json!({"id": 1})), row(json!({"id": 2}))],
        )
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(store.rows("users").unwrap().len(), 2);
}

// =============================================================================
// Update and Delete Tests
// =============================================================================

#[test]
fn test_update_merges_patch_into_matches() {
    let mut store = seeded();

    let changed = store
        .query()
        .filter("name", json!("Alice"))
        .update("users", row(json!({"age": 31})));

    assert_eq!(changed.unwrap(), 1);
    let alice = store.query().filter("id", json!(1)).get_one("users").unwrap();
    let alice = alice.unwrap();
    assert_eq!(alice["age"], json!(31));
    assert_eq!(alice["name"], json!("Alice"));
}

#[test]
fn test_hard_delete_removes_rows() {
    let mut store = seeded();

    let removed = store
        .query()
        .filter("id", json!(1))
        .delete("users")
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(store.rows("users").unwrap().len(), 1);
}

#[test]
fn test_soft_delete_hides_rows_but_keeps_them() {
    let mut store = TableStore::new(StoreConfig::new().soft_delete(true));
    store.create_table("users", None).unwrap();
    store.insert("users", row(json!({"id": 1}))).unwrap();

    store.query().filter("id", json!(1)).delete("users").unwrap();

    // Gone from query results...
    assert_eq!(store.query().count("users").unwrap(), 0);
    assert!(!store.exists("users"));
    // ...but still physically present, with a deletion stamp.
    let raw = store.rows("users").unwrap();
    assert_eq!(raw.len(), 1);
    assert!(raw[0].contains_key("deleted_at"));
}

#[test]
fn test_truncate_clears_rows_without_triggers() {
    let mut store = seeded();
    store
        .create_trigger(
            "users",
            "block",
            Box::new(|ctx| Ok(ctx.operation != Operation::Delete)),
        )
        .unwrap();

    store.truncate("users").unwrap();

    assert!(store.rows("users").unwrap().is_empty());
}

// =============================================================================
// Column Tests
// =============================================================================

#[test]
fn test_add_column_backfills_without_overwriting() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();
    store.insert("users", row(json!({"id": 1}))).unwrap();
    store
        .insert("users", row(json!({"id": 2, "role": "admin"})))
        .unwrap();

    store.add_column("users", "role", json!("member")).unwrap();

    let rows = store.rows("users").unwrap();
    assert_eq!(rows[0]["role"], json!("member"));
    assert_eq!(rows[1]["role"], json!("admin"));
}

#[test]
fn test_drop_column_removes_field_everywhere() {
    let mut store = seeded();

    store.drop_column("users", "age").unwrap();

    for r in store.rows("users").unwrap() {
        assert!(!r.contains_key("age"));
    }
}

// =============================================================================
// Trigger Tests
// =============================================================================

#[test]
fn test_insert_trigger_veto_rejects_the_row() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();
    store
        .create_trigger(
            "users",
            "no_minors",
            Box::new(|ctx: &TriggerContext| {
                if ctx.operation != Operation::Insert {
                    return Ok(true);
                }
                let age = ctx
                    .new
                    .as_ref()
                    .and_then(|r| r.get("age"))
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                Ok(age >= 18)
            }),
        )
        .unwrap();

    let accepted = store
        .insert("users", row(json!({"id": 1, "age": 15})))
        .unwrap();
    assert!(accepted.is_none());
    assert_eq!(store.rows("users").unwrap().len(), 0);

    let accepted = store
        .insert("users", row(json!({"id": 2, "age": 40})))
        .unwrap();
    assert!(accepted.is_some());
}

#[test]
fn test_update_trigger_sees_old_and_new_row() {
    let mut store = seeded();
    store
        .create_trigger(
            "users",
            "age_only_grows",
            Box::new(|ctx: &TriggerContext| {
                if ctx.operation != Operation::Update {
                    return Ok(true);
                }
                let old_age = ctx.old.as_ref().and_then(|r| r.get("age")).and_then(Value::as_i64);
                let new_age = ctx.new.as_ref().and_then(|r| r.get("age")).and_then(Value::as_i64);
                Ok(new_age >= old_age)
            }),
        )
        .unwrap();

    let changed = store
        .query()
        .filter("id", json!(1))
        .update("users", row(json!({"age": 20})));
    assert_eq!(changed.unwrap(), 0);

    let changed = store
        .query()
        .filter("id", json!(1))
        .update("users", row(json!({"age": 35})));
    assert_eq!(changed.unwrap(), 1);
}

#[test]
fn test_failing_trigger_does_not_block_the_write() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();
    store
        .create_trigger(
            "users",
            "broken",
            Box::new(|_| Err("callback exploded".to_string())),
        )
        .unwrap();

    let accepted = store.insert("users", row(json!({"id": 1}))).unwrap();
    assert!(accepted.is_some());
    assert_eq!(store.rows("users").unwrap().len(), 1);
}

#[test]
fn test_drop_trigger_removes_only_the_named_one() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();
    store
        .create_trigger("users", "first", Box::new(|_| Ok(false)))
        .unwrap();
    store
        .create_trigger("users", "second", Box::new(|_| Ok(true)))
        .unwrap();

    store.drop_trigger("users", "first").unwrap();

    // The veto is gone but "second" still runs: insert goes through.
    let accepted = store.insert("users", row(json!({"id": 1}))).unwrap();
    assert!(accepted.is_some());
    // Dropping it again is an error.
    assert!(matches!(
        store.drop_trigger("users", "first").unwrap_err(),
        StoreError::TriggerNotFound { .. }
    ));
}

#[test]
fn test_duplicate_trigger_name_rejected() {
    let mut store = TableStore::default();
    store.create_table("users", None).unwrap();
    store
        .create_trigger("users", "audit", Box::new(|_| Ok(true)))
        .unwrap();

    let err = store
        .create_trigger("users", "audit", Box::new(|_| Ok(true)))
        .unwrap_err();
    assert!(matches!(err, StoreError::TriggerAlreadyExists { .. }));
}

// =============================================================================
// Relationship and Index Tests
// =============================================================================

#[test]
fn test_relationship_requires_both_tables() {
    let mut store = seeded();

    let err = store
        .create_relationship("users", "ghosts", RelationKind::HasMany, "user_id")
        .unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(_)));
}

#[test]
fn test_index_snapshot_groups_rows_by_column_value() {
    let mut store = seeded();
    store
        .insert("users", row(json!({"id": 3, "name": "Alice", "age": 41})))
        .unwrap();

    let key = store.create_index("users", &["name".to_string()]).unwrap();

    let index = store.index(&key).unwrap();
    assert_eq!(index.get("Alice").unwrap().len(), 2);
    assert_eq!(index.get("Bob").unwrap().len(), 1);
}

#[test]
fn test_index_is_a_snapshot_not_live() {
    let mut store = seeded();
    let key = store.create_index("users", &["name".to_string()]).unwrap();

    store
        .insert("users", row(json!({"id": 3, "name": "Cara"})))
        .unwrap();

    // Built before Cara arrived; not maintained on write.
    assert!(store.index(&key).unwrap().get("Cara").is_none());
}
