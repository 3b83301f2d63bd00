//! Canonical formatting
//!
//! Keys are sorted ordinally and padded to the longest key so the separators line up,
//! followed by four blank lines and the untouched trailer:
//!
//!     Bye  =See you
//!     Hello=Hi {0}
//!
//!
//!
//!
//!     !!! trailer kept as-is
//!
//! The output depends only on the key set, the values and the trailer, so formatting is
//! idempotent across a parse/format cycle.

use super::parser::{parse, ParseError};
use super::table::Table;
use crate::text::utf16_len;

/// Blank lines between the key region and the trailer.
pub const SEPARATOR_LINES: usize = 4;

pub fn format_table(table: &Table) -> Vec<String> {
    let width = table.key_width();
    let entries = table.sorted_entries();
    let mut lines = Vec::with_capacity(entries.len() + SEPARATOR_LINES + table.tail_lines().len());

    for entry in entries {
        let padding = " ".repeat(width - utf16_len(&entry.key));
        lines.push(format!("{}{}={}", entry.key, padding, entry.value));
    }
    lines.extend(std::iter::repeat(String::new()).take(SEPARATOR_LINES));
    lines.extend(table.tail_lines().iter().cloned());
    lines
}

/// Formatted lines joined with `\n`.
pub fn format_text(table: &Table) -> String {
    format_table(table).join("\n")
}

/// Parse and format in one step.
pub fn format_source(source: &str) -> Result<String, ParseError> {
    parse(source).map(|table| format_text(&table))
}
