//! Structural checks over a parsed table
//!
//! The parser only rejects what it cannot represent. Everything else that is legal to parse
//! but suspicious is reported here:
//!
//! 1. **Duplicate keys**: the earlier value was silently replaced (warning on both lines)
//! 2. **Empty keys**: `=value` lines cannot be exported (error)
//! 3. **Non-identifier keys**: the generated constant would not compile (warning)

use super::table::Table;
use crate::diagnostics::Diagnostic;

pub const DUPLICATE_KEY: &str = "duplicate-key";
pub const EMPTY_KEY: &str = "empty-key";
pub const INVALID_IDENTIFIER: &str = "invalid-identifier";

/// Collect diagnostics for a table, ordered by line.
pub fn validate(table: &Table) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for duplicate in table.duplicates() {
        diagnostics.push(Diagnostic::warning(
            duplicate.first_line,
            DUPLICATE_KEY,
            format!(
                "`{}` is redefined on line {}; this value is discarded",
                duplicate.key,
                duplicate.line + 1
            ),
        ));
        diagnostics.push(Diagnostic::warning(
            duplicate.line,
            DUPLICATE_KEY,
            format!(
                "`{}` was already defined on line {}",
                duplicate.key,
                duplicate.first_line + 1
            ),
        ));
    }

    for entry in table.entries() {
        if entry.key.is_empty() {
            diagnostics.push(Diagnostic::error(entry.line, EMPTY_KEY, "key is empty"));
        } else if !is_identifier(&entry.key) {
            diagnostics.push(Diagnostic::warning(
                entry.line,
                INVALID_IDENTIFIER,
                format!("`{}` is not a valid constant name", entry.key),
            ));
        }
    }

    diagnostics.sort_by_key(|diagnostic| diagnostic.line);
    diagnostics
}

/// Letters, digits and underscores, not starting with a digit.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|ch| ch == '_' || ch.is_alphanumeric())
        }
        _ => false,
    }
}
