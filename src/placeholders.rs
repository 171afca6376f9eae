// ABOUTME: Placeholder scanning for SQL templates with named or positional markers
// ABOUTME: Skips quoted text and comments, and rewrites named tokens to numbered markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Placeholder Scanning
//!
//! This is a lexical scan, not a SQL parser. It recognizes `:name` and `?`
//! markers outside of quoted strings, quoted identifiers, and comments.
//! `::` (a cast in some dialects) is never a placeholder. Numbered `?NNN`
//! markers are rejected because named placeholders are rewritten to them.

use bound_sql_core::StatementError;
use std::ops::Range;

/// A placeholder token found in SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderToken {
    /// `:name`, stored without the colon
    Named(String),
    /// `?`
    Positional,
}

/// A placeholder and its byte range in the scanned SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Token kind
    pub token: PlaceholderToken,
    /// Byte range of the whole token, including `:` or `?`
    pub span: Range<usize>,
}

/// SQL text together with the placeholders found in it
#[derive(Debug, Clone)]
pub struct ScannedSql<'a> {
    sql: &'a str,
    placeholders: Vec<Placeholder>,
}

impl<'a> ScannedSql<'a> {
    /// Original SQL text
    #[must_use]
    pub const fn sql(&self) -> &'a str {
        self.sql
    }

    /// Every placeholder in order of appearance
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Whether the SQL has no placeholders at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Number of `?` markers
    #[must_use]
    pub fn positional_count(&self) -> usize {
        self.placeholders
            .iter()
            .filter(|p| p.token == PlaceholderToken::Positional)
            .count()
    }

    /// Distinct named placeholders in order of first appearance
    #[must_use]
    pub fn named(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for placeholder in &self.placeholders {
            if let PlaceholderToken::Named(name) = &placeholder.token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Whether any `:name` token is present
    #[must_use]
    pub fn has_named(&self) -> bool {
        self.placeholders
            .iter()
            .any(|p| matches!(p.token, PlaceholderToken::Named(_)))
    }

    /// Replace each `:name` with `?N`, where `N` is `index_of(name)`.
    ///
    /// `index_of` must be 1-based; repeated names map to the same index so
    /// one bound value serves every occurrence.
    #[must_use]
    pub fn rewrite_named<F>(&self, index_of: F) -> String
    where
        F: Fn(&str) -> usize,
    {
        let mut rewritten = String::with_capacity(self.sql.len());
        let mut cursor = 0;
        for placeholder in &self.placeholders {
            if let PlaceholderToken::Named(name) = &placeholder.token {
                rewritten.push_str(&self.sql[cursor..placeholder.span.start]);
                rewritten.push('?');
                rewritten.push_str(&index_of(name).to_string());
                cursor = placeholder.span.end;
            }
        }
        rewritten.push_str(&self.sql[cursor..]);
        rewritten
    }
}

/// Lexical rules for quoted text and comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Quotes escape only by doubling; `--` and `/* */` comments
    #[default]
    Standard,
    /// Adds backslash escapes in `'` and `"` strings and `#` line comments;
    /// `--` starts a comment only when followed by whitespace
    MySql,
}

impl Dialect {
    const fn backslash_escapes(self, quote: u8) -> bool {
        matches!(self, Self::MySql) && quote != b'`'
    }

    fn starts_line_comment(self, bytes: &[u8], i: usize) -> bool {
        match (self, bytes[i]) {
            (Self::MySql, b'#') => true,
            (Self::MySql, b'-') => {
                bytes.get(i + 1) == Some(&b'-')
                    && !matches!(bytes.get(i + 2), Some(b) if !b.is_ascii_whitespace() && !b.is_ascii_control())
            }
            (Self::Standard, b'-') => bytes.get(i + 1) == Some(&b'-'),
            _ => false,
        }
    }
}

/// Scan `sql` for placeholders using [`Dialect::Standard`] rules.
///
/// # Errors
///
/// Returns `StatementError::InvalidArgument` when the SQL uses numbered `?NNN` markers
pub fn scan(sql: &str) -> Result<ScannedSql<'_>, StatementError> {
    scan_dialect(sql, Dialect::Standard)
}

/// Scan `sql` for placeholders using the quoting and comment rules of `dialect`.
///
/// # Errors
///
/// Returns `StatementError::InvalidArgument` when the SQL uses numbered `?NNN` markers
pub fn scan_dialect(sql: &str, dialect: Dialect) -> Result<ScannedSql<'_>, StatementError> {
    let bytes = sql.as_bytes();
    let mut placeholders = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_quoted(bytes, i, quote, dialect.backslash_escapes(quote));
            }
            b'-' | b'#' if dialect.starts_line_comment(bytes, i) => {
                i = skip_line_comment(bytes, i);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'?' => {
                if bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
                    return Err(StatementError::invalid_argument(format!(
                        "numbered placeholder at byte {i} is not supported; use :name or ?"
                    )));
                }
                placeholders.push(Placeholder {
                    token: PlaceholderToken::Positional,
                    span: i..i + 1,
                });
                i += 1;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' => {
                let start = i + 1;
                let end = identifier_end(bytes, start);
                if end > start {
                    placeholders.push(Placeholder {
                        token: PlaceholderToken::Named(sql[start..end].to_owned()),
                        span: i..end,
                    });
                    i = end;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    Ok(ScannedSql { sql, placeholders })
}

/// Whether `key` could name a placeholder (`[A-Za-z_][A-Za-z0-9_]*`)
#[must_use]
pub fn is_valid_name(key: &str) -> bool {
    !key.is_empty() && identifier_end(key.as_bytes(), 0) == key.len()
}

fn identifier_end(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return start,
    }
    let mut end = start + 1;
    while bytes
        .get(end)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        end += 1;
    }
    end
}

// A doubled quote inside a quoted run is an escaped quote.
fn skip_quoted(bytes: &[u8], open: usize, quote: u8, backslash_escapes: bool) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        if backslash_escapes && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| *b == b'\n')
        .map_or(bytes.len(), |offset| start + offset + 1)
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map_or(bytes.len(), |offset| start + 2 + offset + 2)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_named_placeholders_in_order() {
        let scanned = scan("SELECT * FROM t WHERE a = :a AND b = :b OR a = :a").unwrap();
        assert_eq!(scanned.named(), vec!["a", "b"]);
        assert_eq!(scanned.placeholders().len(), 3);
        assert_eq!(scanned.positional_count(), 0);
    }

    #[test]
    fn test_positional_placeholders() {
        let scanned = scan("INSERT INTO t (a, b) VALUES (?, ?)").unwrap();
        assert_eq!(scanned.positional_count(), 2);
        assert!(!scanned.has_named());
    }

    #[test]
    fn test_quoted_text_and_comments_are_skipped() {
        let sql = "SELECT ':not', \"col?\", `x:y` -- :comment ?\n\
                   FROM t /* ? :block */ WHERE t.at = '12:30' AND id = :id";
        let scanned = scan(sql).unwrap();
        assert_eq!(scanned.named(), vec!["id"]);
        assert_eq!(scanned.positional_count(), 0);
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let scanned = scan("SELECT 'it''s :x' WHERE y = ?").unwrap();
        assert!(!scanned.has_named());
        assert_eq!(scanned.positional_count(), 1);
    }

    #[test]
    fn test_cast_is_not_a_placeholder() {
        let scanned = scan("SELECT value::text FROM t WHERE id = :id").unwrap();
        assert_eq!(scanned.named(), vec!["id"]);
    }

    #[test]
    fn test_bare_colon_is_ignored() {
        let scanned = scan("SELECT 1 : 2").unwrap();
        assert!(scanned.is_empty());
    }

    #[test]
    fn test_numbered_placeholder_rejected() {
        let err = scan("SELECT * FROM t WHERE id = ?1").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_rewrite_named_reuses_indexes() {
        let scanned = scan("UPDATE t SET a = :a WHERE b = :b OR a = :a").unwrap();
        let names = scanned.named();
        let rewritten = scanned.rewrite_named(|name| {
            names.iter().position(|n| *n == name).unwrap_or(0) + 1
        });
        assert_eq!(rewritten, "UPDATE t SET a = ?1 WHERE b = ?2 OR a = ?1");
    }

    #[test]
    fn test_rewrite_keeps_multibyte_text() {
        let scanned = scan("SELECT 'café' AS c WHERE n = :name").unwrap();
        assert_eq!(
            scanned.rewrite_named(|_| 1),
            "SELECT 'café' AS c WHERE n = ?1"
        );
    }

    #[test]
    fn test_unterminated_comment_consumes_rest() {
        let scanned = scan("SELECT 1 /* :x").unwrap();
        assert!(scanned.is_empty());
    }

    #[test]
    fn test_mysql_backslash_escape_keeps_string_closed() {
        let sql = r"SELECT id FROM users WHERE name = 'O\'Brien' AND id = ?";
        let scanned = scan_dialect(sql, Dialect::MySql).unwrap();
        assert_eq!(scanned.positional_count(), 1);
        assert_eq!(scanned.placeholders()[0].span.start, sql.len() - 1);

        let scanned = scan_dialect(r#"SELECT "a\"b ?" AS c WHERE x = :x"#, Dialect::MySql).unwrap();
        assert_eq!(scanned.named(), vec!["x"]);
    }

    #[test]
    fn test_mysql_hash_comment() {
        let scanned = scan_dialect("DELETE FROM t WHERE id = ? # why?", Dialect::MySql).unwrap();
        assert_eq!(scanned.positional_count(), 1);

        let scanned =
            scan_dialect("SELECT 1 # :skipped\nFROM t WHERE a = ?", Dialect::MySql).unwrap();
        assert_eq!(scanned.positional_count(), 1);
        assert!(!scanned.has_named());
    }

    #[test]
    fn test_mysql_double_dash_needs_whitespace() {
        let scanned = scan_dialect("UPDATE t SET n = n--? WHERE a = ?", Dialect::MySql).unwrap();
        assert_eq!(scanned.positional_count(), 2);

        let scanned = scan_dialect("SELECT ? -- ?", Dialect::MySql).unwrap();
        assert_eq!(scanned.positional_count(), 1);
        let scanned = scan_dialect("SELECT ? --", Dialect::MySql).unwrap();
        assert_eq!(scanned.positional_count(), 1);
    }

    #[test]
    fn test_standard_dialect_keeps_hash_and_backslash_literal() {
        let scanned = scan("SELECT a # b FROM t WHERE c = ?").unwrap();
        assert_eq!(scanned.positional_count(), 1);

        // In standard SQL a backslash does not escape, so the string ends at the second quote.
        let scanned = scan(r"SELECT 'a\' AS c WHERE id = ?").unwrap();
        assert_eq!(scanned.positional_count(), 1);
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("user_id"));
        assert!(is_valid_name("_x1"));
        assert!(!is_valid_name("1x"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a-b"));
    }
}
