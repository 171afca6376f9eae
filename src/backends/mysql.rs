// ABOUTME: MySQL statement backend built on the sqlx MySQL driver
// ABOUTME: Positional placeholders only, with rows decoded by declared column type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! MySQL backend
//!
//! Accepts `?` markers only. Binding uses the tag-selected encoding, so
//! floats travel as doubles and byte strings as blobs.

use super::{ExecOutcome, StatementBackend};
use crate::binding::{BoundParam, BoundStatement};
use crate::placeholders::Dialect;
use async_trait::async_trait;
use bound_sql_core::{FetchMode, PlaceholderStyle, Row, SqlValue};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row as _, TypeInfo, ValueRef};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// MySQL backend
#[derive(Clone)]
pub struct MySqlBackend {
    pool: MySqlPool,
}

impl MySqlBackend {
    /// Connect to a MySQL server
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the server is unreachable
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let options = MySqlConnectOptions::from_str(database_url)?;
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;

        debug!(backend = "mysql", "MySQL pool ready");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the pool for operations outside the executor
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    fn build_query<'q>(statement: &'q BoundStatement) -> Query<'q, MySql, MySqlArguments> {
        statement
            .params
            .iter()
            .fold(sqlx::query(&statement.sql).persistent(false), bind_param)
    }
}

#[async_trait]
impl StatementBackend for MySqlBackend {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Positional
    }

    fn dialect(&self) -> Dialect {
        Dialect::MySql
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
        let last_insert_id = i64::try_from(result.last_insert_id())
            .ok()
            .filter(|id| *id != 0);
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }
}

fn bind_param<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    param: &'q BoundParam,
) -> Query<'q, MySql, MySqlArguments> {
    match &param.value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Integer(i) => query.bind(*i),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.as_str()),
        SqlValue::Bytes(b) => query.bind(b.as_slice()),
    }
}

fn decode_row(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    let mut decoded = Row::with_capacity(row.len());
    for column in row.columns() {
        let index = column.ordinal();
        if row.try_get_raw(index)?.is_null() {
            decoded.push(column.name(), SqlValue::Null);
            continue;
        }
        let type_name = column.type_info().name();
        decoded.push(column.name(), decode_value(row, index, type_name)?);
    }
    Ok(decoded)
}

/// How a column's declared type is read back into a `SqlValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnDecoder {
    Bool,
    Signed,
    Year,
    Unsigned,
    Float,
    Double,
    Date,
    Time,
    DateTime,
    Bytes,
    Text,
}

fn column_decoder(type_name: &str) -> ColumnDecoder {
    match type_name {
        "BOOLEAN" => ColumnDecoder::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => ColumnDecoder::Signed,
        "YEAR" => ColumnDecoder::Year,
        name if name.ends_with("UNSIGNED") => ColumnDecoder::Unsigned,
        "FLOAT" => ColumnDecoder::Float,
        "DOUBLE" => ColumnDecoder::Double,
        "DATE" => ColumnDecoder::Date,
        "TIME" => ColumnDecoder::Time,
        "DATETIME" | "TIMESTAMP" => ColumnDecoder::DateTime,
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT"
        | "GEOMETRY" => ColumnDecoder::Bytes,
        // DECIMAL, JSON, ENUM, SET and character types
        _ => ColumnDecoder::Text,
    }
}

// Values past i64::MAX keep their exact digits as text.
fn unsigned_value(unsigned: u64) -> SqlValue {
    i64::try_from(unsigned).map_or_else(
        |_| SqlValue::Text(unsigned.to_string()),
        SqlValue::Integer,
    )
}

fn temporal_text(value: impl Display) -> SqlValue {
    SqlValue::Text(value.to_string())
}

fn decode_value(row: &MySqlRow, index: usize, type_name: &str) -> Result<SqlValue, sqlx::Error> {
    let value = match column_decoder(type_name) {
        ColumnDecoder::Bool => SqlValue::Bool(row.try_get(index)?),
        ColumnDecoder::Signed => SqlValue::Integer(row.try_get(index)?),
        ColumnDecoder::Year => SqlValue::Integer(row.try_get_unchecked(index)?),
        ColumnDecoder::Unsigned => unsigned_value(row.try_get(index)?),
        ColumnDecoder::Float => SqlValue::Float(f64::from(row.try_get::<f32, _>(index)?)),
        ColumnDecoder::Double => SqlValue::Float(row.try_get(index)?),
        ColumnDecoder::Date => temporal_text(row.try_get::<NaiveDate, _>(index)?),
        ColumnDecoder::Time => temporal_text(row.try_get::<NaiveTime, _>(index)?),
        ColumnDecoder::DateTime => temporal_text(row.try_get::<NaiveDateTime, _>(index)?),
        ColumnDecoder::Bytes => SqlValue::Bytes(row.try_get_unchecked(index)?),
        ColumnDecoder::Text => SqlValue::Text(row.try_get_unchecked(index)?),
    };
    Ok(value)
}
