// ABOUTME: Integration tests for the statement executor against SQLite with named placeholders
// ABOUTME: Covers result shaping, affected counts, insert ids, rejections, and validation failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use bound_sql::executor::{self, SelectOptions};
use bound_sql::{
    OperationKind, OperationResult, ParameterSet, PlaceholderStyle, SelectedRows, SqlValue,
    StatementError,
};
use common::{file_backend, memory_backend, seed_messages, seed_users};

#[tokio::test]
async fn test_select_single_row_by_named_id() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::select(
        &backend,
        "SELECT name FROM users WHERE id = :id",
        &ParameterSet::named([(":id", 7)]),
        SelectOptions::default().one(),
    )
    .await
    .unwrap();

    assert_eq!(result.row_count, 1);
    let SelectedRows::One(Some(row)) = &result.rows else {
        panic!("expected a single row, got {:?}", result.rows);
    };
    assert_eq!(row.len(), 1);
    assert_eq!(row.get("name"), Some(&SqlValue::Text("Ann".into())));
}

#[tokio::test]
async fn test_select_single_row_without_match() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::select(
        &backend,
        "SELECT name FROM users WHERE id = :id",
        &ParameterSet::named([(":id", 99)]),
        SelectOptions::default().one(),
    )
    .await
    .unwrap();

    assert_eq!(result.row_count, 0);
    assert_eq!(result.rows, SelectedRows::One(None));
}

#[tokio::test]
async fn test_fetch_all_length_matches_row_count() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_messages(&backend).await;

    let result = executor::select(
        &backend,
        "SELECT id, body FROM messages WHERE source = :source ORDER BY id",
        &ParameterSet::named([(":source", "import")]),
        SelectOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.row_count, 2);
    assert_eq!(result.rows.len() as u64, result.row_count);
    let bodies: Vec<_> = result
        .rows
        .into_vec()
        .iter()
        .map(|row| row.get("body").and_then(SqlValue::as_str).unwrap().to_owned())
        .collect();
    assert_eq!(bodies, vec!["a", "b"]);
}

#[tokio::test]
async fn test_select_without_placeholders() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::select(
        &backend,
        "SELECT COUNT(*) AS n FROM users",
        &ParameterSet::new(),
        SelectOptions::default().without_placeholders(),
    )
    .await
    .unwrap();

    let row = result.rows.first().unwrap();
    assert_eq!(row.get("n"), Some(&SqlValue::Integer(2)));

    let err = executor::select(
        &backend,
        "SELECT name FROM users WHERE id = :id",
        &ParameterSet::named([(":id", 7)]),
        SelectOptions::default().without_placeholders(),
    )
    .await
    .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_delete_reports_affected_rows() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_messages(&backend).await;

    let result = executor::delete(
        &backend,
        "DELETE FROM messages WHERE source = :s",
        &ParameterSet::named([(":s", "import")]),
    )
    .await
    .unwrap();

    assert!(result.succeeded);
    assert_eq!(result.affected_count, 2);
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn test_insert_reports_last_insert_id() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::insert(
        &backend,
        "INSERT INTO users (name) VALUES (:name)",
        &ParameterSet::named([(":name", "Cy")]),
    )
    .await
    .unwrap();

    assert!(result.succeeded);
    assert_eq!(result.affected_count, 1);
    assert_eq!(result.last_insert_id, Some(9));
    assert_eq!(result.error, None);

    let lookup = executor::select(
        &backend,
        "SELECT name FROM users WHERE id = :id",
        &ParameterSet::named([(":id", result.last_insert_id.unwrap())]),
        SelectOptions::default().one(),
    )
    .await
    .unwrap();
    assert_eq!(
        lookup.rows.first().unwrap().get("name"),
        Some(&SqlValue::Text("Cy".into()))
    );
}

#[tokio::test]
async fn test_update_matching_nothing() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::update(
        &backend,
        "UPDATE users SET note = :note WHERE id = :id",
        &ParameterSet::new()
            .with_named(":note", "unused")
            .with_named(":id", 404),
    )
    .await
    .unwrap();

    assert!(!result.succeeded);
    assert_eq!(result.affected_count, 0);
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn test_rejected_insert_is_reported_in_result() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::insert(
        &backend,
        "INSERT INTO users (name) VALUES (:name)",
        &ParameterSet::named([(":name", "Ann")]),
    )
    .await
    .unwrap();

    assert!(!result.succeeded);
    assert_eq!(result.affected_count, 0);
    assert_eq!(result.last_insert_id, None);
    assert!(result.error.unwrap().contains("UNIQUE"));
}

#[tokio::test]
async fn test_select_failure_is_driver_error() {
    let backend = memory_backend(PlaceholderStyle::Named).await;

    let err = executor::select(
        &backend,
        "SELECT name FROM missing_table WHERE id = :id",
        &ParameterSet::named([(":id", 1)]),
        SelectOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StatementError::Driver { .. }));
}

#[tokio::test]
async fn test_mismatch_then_valid_call_on_same_backend() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;
    let sql = "SELECT name FROM users WHERE id = :id";

    let err = executor::select(
        &backend,
        sql,
        &ParameterSet::named([(":other", 7)]),
        SelectOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = executor::update(
        &backend,
        "UPDATE users SET note = :note WHERE id = :id",
        &ParameterSet::named([(":note", "x")]),
    )
    .await
    .unwrap_err();
    assert!(err.is_invalid_argument());

    let result = executor::select(
        &backend,
        sql,
        &ParameterSet::named([(":id", 7)]),
        SelectOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(result.row_count, 1);
}

#[tokio::test]
async fn test_mutations_require_parameters() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_messages(&backend).await;

    let err = executor::delete(&backend, "DELETE FROM messages", &ParameterSet::new())
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = executor::insert(&backend, "", &ParameterSet::named([(":a", 1)]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_value_round_trip() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let params = ParameterSet::new()
        .with_named(":name", "Dee")
        .with_named(":active", false)
        .with_named(":score", 2.5)
        .with_named(":note", SqlValue::Null);
    let inserted = executor::insert(
        &backend,
        "INSERT INTO users (name, active, score, note) VALUES (:name, :active, :score, :note)",
        &params,
    )
    .await
    .unwrap();
    let id = inserted.last_insert_id.unwrap();

    let result = executor::select(
        &backend,
        "SELECT id, name, active, score, note FROM users WHERE id = :id",
        &ParameterSet::named([(":id", id)]),
        SelectOptions::default().one(),
    )
    .await
    .unwrap();
    let row = result.rows.first().unwrap();

    assert_eq!(row.get("id").and_then(SqlValue::as_i64), Some(id));
    assert_eq!(row.get("name").and_then(SqlValue::as_str), Some("Dee"));
    assert_eq!(row.get("active").and_then(SqlValue::as_bool), Some(false));
    assert_eq!(row.get("score").and_then(SqlValue::as_f64), Some(2.5));
    assert_eq!(row.get("note"), Some(&SqlValue::Null));
    assert_eq!(
        row.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "active", "score", "note"]
    );
}

#[tokio::test]
async fn test_repeated_named_placeholder_binds_once() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::select(
        &backend,
        "SELECT id FROM users WHERE name = :who OR note = :who",
        &ParameterSet::named([(":who", "Bob")]),
        SelectOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.row_count, 1);
    assert_eq!(
        result.rows.first().unwrap().get("id"),
        Some(&SqlValue::Integer(8))
    );
}

#[tokio::test]
async fn test_quoted_colon_is_not_a_placeholder() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let result = executor::update(
        &backend,
        "UPDATE users SET note = 'time: 10:30' WHERE id = :id",
        &ParameterSet::named([(":id", 7)]),
    )
    .await
    .unwrap();
    assert_eq!(result.affected_count, 1);

    let row = executor::select(
        &backend,
        "SELECT note FROM users WHERE id = :id",
        &ParameterSet::named([(":id", 7)]),
        SelectOptions::default().one(),
    )
    .await
    .unwrap();
    assert_eq!(
        row.rows.first().unwrap().get("note"),
        Some(&SqlValue::Text("time: 10:30".into()))
    );
}

#[tokio::test]
async fn test_binary_value_fails_only_that_call() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_users(&backend).await;

    let err = executor::update(
        &backend,
        "UPDATE users SET note = :note WHERE id = :id",
        &ParameterSet::new()
            .with_named(":note", vec![0xff_u8, 0xfe])
            .with_named(":id", 7),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StatementError::TypeBinding { .. }));

    let result = executor::update(
        &backend,
        "UPDATE users SET note = :note WHERE id = :id",
        &ParameterSet::new()
            .with_named(":note", b"plain".as_slice())
            .with_named(":id", 7),
    )
    .await
    .unwrap();
    assert!(result.succeeded);
}

#[tokio::test]
async fn test_execute_entry_point_on_file_database() {
    let (_dir, backend) = file_backend(PlaceholderStyle::Named).await;
    seed_messages(&backend).await;

    let result = executor::execute(
        &backend,
        OperationKind::Update,
        "UPDATE messages SET body = :body WHERE source = :source",
        &ParameterSet::new()
            .with_named(":body", "edited")
            .with_named(":source", "manual"),
    )
    .await
    .unwrap();
    assert_eq!(result.kind(), OperationKind::Update);
    assert_eq!(result.error(), None);

    let result = executor::execute(
        &backend,
        OperationKind::Select,
        "SELECT body FROM messages WHERE source = :source",
        &ParameterSet::named([(":source", "manual")]),
    )
    .await
    .unwrap();
    let OperationResult::Select(select) = result else {
        panic!("expected a select result");
    };
    assert_eq!(
        select.rows.first().unwrap().get("body"),
        Some(&SqlValue::Text("edited".into()))
    );
}

#[tokio::test]
async fn test_statement_level_rejection_keeps_backend_usable() {
    let backend = memory_backend(PlaceholderStyle::Named).await;
    seed_messages(&backend).await;

    let result = executor::insert(
        &backend,
        "INSERT INTO messages (source, body) VALUES (:source, :body, :extra)",
        &ParameterSet::new()
            .with_named(":source", "x")
            .with_named(":body", "y")
            .with_named(":extra", "z"),
    )
    .await
    .unwrap();
    assert!(!result.succeeded);
    assert!(result.error.is_some());

    let result = executor::insert(
        &backend,
        "INSERT INTO messages (source, body) VALUES (:source, :body)",
        &ParameterSet::new()
            .with_named(":source", "x")
            .with_named(":body", "y"),
    )
    .await
    .unwrap();
    assert!(result.succeeded);
    assert_eq!(result.last_insert_id, Some(4));
}
