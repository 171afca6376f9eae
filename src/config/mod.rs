// ABOUTME: Configuration module for connection and placeholder settings
// ABOUTME: Loads database configuration from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for `bound-sql`
//!
//! Configuration is environment-only:
//!
//! - **Database**: connection URL, pool sizing, acquire timeout, placeholder style

/// Database URL parsing and pool configuration
pub mod database;

pub use database::{DatabaseConfig, DatabaseUrl};
