// ABOUTME: Call-level error type for statement validation, binding, and driver failures
// ABOUTME: Confines every failure to the current call and converts into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Statement Error Types
//!
//! `StatementError` is returned by every executor operation:
//! - `InvalidArgument` - usage errors detected before the driver is touched
//! - `Driver` - failures reported by the database driver
//! - `TypeBinding` - a value the backend has no bind-type tag for

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors produced by a single statement call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StatementError {
    /// SQL text or parameter set is unusable
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input
        reason: String,
    },
    /// The driver failed to prepare, execute, or fetch
    #[error("driver error: {message}")]
    Driver {
        /// Driver-reported message
        message: String,
    },
    /// A value cannot be bound by this backend
    #[error("cannot bind {value_type} value to placeholder {placeholder}")]
    TypeBinding {
        /// Placeholder the value was supplied for
        placeholder: String,
        /// Kind of the offending value
        value_type: String,
    },
}

impl StatementError {
    /// Create an "invalid argument" error
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a "driver" error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a "type binding" error
    #[must_use]
    pub fn type_binding(placeholder: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::TypeBinding {
            placeholder: placeholder.into(),
            value_type: value_type.into(),
        }
    }

    /// Check for a usage error
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Error code this maps to at the application level
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { .. } => ErrorCode::InvalidInput,
            Self::Driver { .. } => ErrorCode::DatabaseError,
            Self::TypeBinding { .. } => ErrorCode::InvalidFormat,
        }
    }
}

impl From<StatementError> for AppError {
    fn from(error: StatementError) -> Self {
        let code = error.error_code();
        Self::new(code, error.to_string()).with_source(error)
    }
}
