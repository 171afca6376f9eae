// ABOUTME: SQLite statement backend built on the sqlx SQLite driver
// ABOUTME: Binds tagged values, decodes rows by storage class, and reports last insert rowid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! SQLite backend
//!
//! Defaults to named placeholders. `binding::prepare` rewrites `:name` to
//! `?N` before the SQL gets here, because the sqlx SQLite driver binds by
//! index only. A positional-mode backend passes `?` markers through.

use super::{ExecOutcome, StatementBackend};
use crate::binding::{BoundParam, BoundStatement};
use async_trait::async_trait;
use bound_sql_core::{FetchMode, PlaceholderStyle, Row, SqlValue};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, SqlitePool, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// SQLite backend
#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
    style: PlaceholderStyle,
}

impl SqliteBackend {
    /// Connect to `database_url`, creating the database file if it does not exist.
    ///
    /// In-memory databases get a single connection that is never recycled,
    /// so every call sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the database cannot be opened
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
        style: PlaceholderStyle,
    ) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        }
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;

        debug!(backend = "sqlite", %style, "SQLite pool ready");
        Ok(Self { pool, style })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: SqlitePool, style: PlaceholderStyle) -> Self {
        Self { pool, style }
    }

    /// Same pool, different placeholder style
    #[must_use]
    pub fn with_style(&self, style: PlaceholderStyle) -> Self {
        Self {
            pool: self.pool.clone(),
            style,
        }
    }

    /// Get a reference to the pool for operations outside the executor
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn build_query<'q>(
        statement: &'q BoundStatement,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        statement
            .params
            .iter()
            .fold(sqlx::query(&statement.sql).persistent(false), bind_param)
    }
}

#[async_trait]
impl StatementBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }

    async fn fetch(
        &self,
        statement: &BoundStatement,
        mode: FetchMode,
    ) -> Result<Vec<Row>, sqlx::Error> {
        let query = Self::build_query(statement);
        let rows = match mode {
            FetchMode::All => query.fetch_all(&self.pool).await?,
            FetchMode::One => query.fetch_optional(&self.pool).await?.into_iter().collect(),
        };
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, statement: &BoundStatement) -> Result<ExecOutcome, sqlx::Error> {
        let result = Self::build_query(statement).execute(&self.pool).await?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_rowid()).filter(|id| *id != 0),
        })
    }
}

/// Whether a SQLite URL names an in-memory database
#[must_use]
pub fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// Values arrive coerced to their tag, so the value variant selects the encoding.
fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &'q BoundParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match &param.value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Integer(i) => query.bind(*i),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.as_str()),
        SqlValue::Bytes(b) => query.bind(b.as_slice()),
    }
}

// Storage class decides the variant; a BOOLEAN column declaration turns integers into bools.
fn decode_row(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut decoded = Row::with_capacity(row.len());
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            let storage = raw.type_info().name().to_owned();
            let declared_bool = column.type_info().name() == "BOOLEAN";
            match storage.as_str() {
                "INTEGER" if declared_bool => SqlValue::Bool(row.try_get_unchecked(index)?),
                "INTEGER" => SqlValue::Integer(row.try_get_unchecked(index)?),
                "REAL" => SqlValue::Float(row.try_get_unchecked(index)?),
                "BLOB" => SqlValue::Bytes(row.try_get_unchecked(index)?),
                _ => SqlValue::Text(row.try_get_unchecked(index)?),
            }
        };
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}
