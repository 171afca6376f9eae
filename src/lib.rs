// ABOUTME: Main library entry point for bound-sql parameterized statement execution
// ABOUTME: Validates placeholders, infers bind types, and runs statements on SQLite or MySQL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Bound SQL
//!
//! Run parameterized select, insert, update, and delete statements against a
//! SQL backend without string interpolation. Every call checks the SQL
//! placeholders against the supplied parameters, tags each value with the
//! bind type the backend expects, executes a single prepared statement, and
//! returns a typed result record.
//!
//! ## Backends
//!
//! - **SQLite**: named `:name` placeholders by default, positional on request
//! - **MySQL** (feature `mysql`): positional `?` placeholders
//!
//! ## Architecture
//!
//! - **placeholders**: lexical scan of the SQL for `:name` and `?` markers
//! - **params**: ordered parameter sets keyed by name or position
//! - **binding**: validation and bind-type inference, producing a `BoundStatement`
//! - **backends**: driver pools that execute bound statements and decode rows
//! - **executor**: the `select`/`insert`/`update`/`delete`/`execute` calls
//! - **config** and **logging**: environment configuration and `tracing` setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bound_sql::backends::factory::Database;
//! use bound_sql::config::DatabaseConfig;
//! use bound_sql::executor::{self, SelectOptions};
//! use bound_sql::params::ParameterSet;
//! use bound_sql::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = DatabaseConfig::from_env()?;
//!     let db = Database::connect(&config).await?;
//!
//!     let params = ParameterSet::named([(":id", 7)]);
//!     let result = executor::select(
//!         &db,
//!         "SELECT name FROM users WHERE id = :id",
//!         &params,
//!         SelectOptions::default().one(),
//!     )
//!     .await?;
//!     println!("{} row(s)", result.row_count);
//!     Ok(())
//! }
//! ```

/// Statement backends and the backend factory
pub mod backends;

/// Validation and bind-type inference for statements
pub mod binding;

/// Environment configuration
pub mod config;

/// Parameterized select, insert, update, and delete calls
pub mod executor;

/// Logging configuration and statement events
pub mod logging;

/// Parameter sets
pub mod params;

/// Placeholder scanning
pub mod placeholders;

pub use backends::factory::Database;
pub use backends::StatementBackend;
pub use bound_sql_core::{
    AppError, AppResult, BindType, ErrorCode, FetchMode, InsertResult, MutationResult,
    OperationKind, OperationResult, PlaceholderStyle, Row, SelectResult, SelectedRows, SqlValue,
    StatementError,
};
pub use executor::{delete, execute, insert, select, update, SelectOptions};
pub use params::ParameterSet;
