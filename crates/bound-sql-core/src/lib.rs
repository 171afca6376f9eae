// ABOUTME: Core types for bound-sql parameterized statement execution
// ABOUTME: Foundation crate with SQL values, bind-type tags, result records, and error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Bound SQL Core
//!
//! Shared types for the `bound-sql` statement executor. This crate carries no
//! driver dependency so it changes rarely and compiles fast.
//!
//! ## Modules
//!
//! - **values**: `SqlValue`, `BindType`, and bind-type inference per placeholder style
//! - **models**: operation kinds, rows, and the per-operation result records
//! - **errors**: `StatementError` for a single call, `AppError` for the application
//! - **constants**: statement keywords, logging limits, configuration defaults

/// Unified error handling with `AppError`, `ErrorCode`, and `StatementError`
pub mod errors;

/// Constants shared by the executor, configuration, and logging
pub mod constants;

/// Operation kinds, rows, and result records
pub mod models;

/// SQL values and bind-type tags
pub mod values;

pub use errors::{AppError, AppResult, ErrorCode, StatementError};
pub use models::{
    FetchMode, InsertResult, MutationResult, OperationKind, OperationResult, Row, SelectResult,
    SelectedRows,
};
pub use values::{BindType, PlaceholderStyle, SqlValue};
