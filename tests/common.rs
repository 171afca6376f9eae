// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, SQLite backends, and seeded tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `bound_sql`

use bound_sql::backends::sqlite::SqliteBackend;
use bound_sql::PlaceholderStyle;
use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// In-memory SQLite backend using the given placeholder style
pub async fn memory_backend(style: PlaceholderStyle) -> SqliteBackend {
    init_test_logging();
    SqliteBackend::connect("sqlite::memory:", 1, Duration::from_secs(5), style)
        .await
        .unwrap()
}

/// File-backed SQLite backend in a temporary directory
///
/// Keep the returned `TempDir` alive for as long as the backend is used.
pub async fn file_backend(style: PlaceholderStyle) -> (TempDir, SqliteBackend) {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("test.db").display());
    let backend = SqliteBackend::connect(&url, 4, Duration::from_secs(5), style)
        .await
        .unwrap();
    (dir, backend)
}

/// Run DDL or seed statements directly on the pool
pub async fn run_sql(backend: &SqliteBackend, statements: &[&str]) {
    for statement in statements {
        sqlx::query(statement).execute(backend.pool()).await.unwrap();
    }
}

/// `users` table with Ann (id 7) and Bob (id 8)
pub async fn seed_users(backend: &SqliteBackend) {
    run_sql(
        backend,
        &[
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                active BOOLEAN NOT NULL DEFAULT 1,
                score REAL,
                note TEXT
            )",
            "INSERT INTO users (id, name, active) VALUES (7, 'Ann', 1), (8, 'Bob', 0)",
        ],
    )
    .await;
}

/// `messages` table with two rows from `import` and one from `manual`
pub async fn seed_messages(backend: &SqliteBackend) {
    run_sql(
        backend,
        &[
            "CREATE TABLE messages (id INTEGER PRIMARY KEY, source TEXT NOT NULL, body TEXT)",
            "INSERT INTO messages (source, body) VALUES ('import', 'a'), ('import', 'b'), ('manual', 'c')",
        ],
    )
    .await;
}
