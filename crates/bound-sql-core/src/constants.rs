// ABOUTME: Constants for statement keywords, log truncation, and configuration defaults
// ABOUTME: Pure data constants shared by the executor, configuration, and logging layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Keywords each statement kind is expected to contain (upper-case, checked case-insensitively)
pub mod keywords {
    /// Keyword expected in SELECT statements
    pub const SELECT: &str = "SELECT";
    /// Keyword expected in INSERT statements
    pub const INSERT: &str = "INSERT ";
    /// Keyword expected in UPDATE statements
    pub const UPDATE: &str = "UPDATE ";
    /// Keyword expected in DELETE statements
    pub const DELETE: &str = "DELETE ";
}

/// Logging limits
pub mod logging {
    /// Longest SQL prefix written to log events
    pub const MAX_LOGGED_SQL_LEN: usize = 200;
    /// Service name reported at startup
    pub const SERVICE_NAME: &str = "bound-sql";
}

/// Database configuration defaults
pub mod database {
    /// Default connection string when `DATABASE_URL` is unset
    pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
    /// Default pool size for file and server databases
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    /// Default time to wait for a pooled connection
    pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
}
