//! Strict key=value parser
//!
//!     Lines are scanned top to bottom:
//!
//!         - blank lines are skipped;
//!         - a line whose trimmed text starts with `!!!` is the cut line and ends the scan;
//!         - any other line must contain `=`. The key is the trimmed text before the first
//!           `=`, the value everything after it, untouched.
//!
//!     Reaching the end of the document without a cut line is an error even when every line
//!     was a valid pair: the marker is structural, not an optional trailer.

use super::table::Table;
use crate::diagnostics::Diagnostic;
use crate::text::split_lines;
use thiserror::Error;
use tracing::debug;

/// Marker that opens the verbatim trailer.
pub const CUT_MARKER: &str = "!!!";

/// Key/value separator.
pub const SEPARATOR: char = '=';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A key region line without a separator. `line` is 0-based.
    #[error("line {} is missing the `=` separator", .line + 1)]
    Malformed { line: usize },
    /// The document ended before a `!!!` cut line.
    #[error("reached end of file without a `!!!` cut line")]
    Unterminated,
}

impl ParseError {
    /// Line the error should be reported on. An unterminated document points at its last line.
    pub fn line(&self, line_count: usize) -> usize {
        match self {
            ParseError::Malformed { line } => *line,
            ParseError::Unterminated => line_count.saturating_sub(1),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Malformed { .. } => "malformed-line",
            ParseError::Unterminated => "missing-cut-line",
        }
    }

    pub fn to_diagnostic(&self, line_count: usize) -> Diagnostic {
        Diagnostic::error(self.line(line_count), self.code(), self.to_string())
    }
}

/// True for a line that terminates the key region.
pub fn is_cut_line(line: &str) -> bool {
    line.trim_start().starts_with(CUT_MARKER)
}

/// Split a key region line into its trimmed key and raw value.
pub fn split_entry(line: &str) -> Option<(&str, &str)> {
    line.split_once(SEPARATOR)
        .map(|(key, value)| (key.trim(), value))
}

/// Parse a whole document, splitting it on any line ending first.
pub fn parse(text: &str) -> Result<Table, ParseError> {
    parse_lines(&split_lines(text))
}

pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Table, ParseError> {
    let mut table = Table::default();

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        if is_cut_line(line) {
            let tail = lines[index..]
                .iter()
                .map(|tail_line| tail_line.as_ref().to_string())
                .collect();
            table.terminate(index, tail);
            debug!(
                entries = table.len(),
                cut_line = index,
                "parsed localization table"
            );
            return Ok(table);
        }

        let (key, value) = split_entry(line).ok_or(ParseError::Malformed { line: index })?;
        table.insert(key, value, index);
    }

    Err(ParseError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_up_to_the_cut_line() {
        let table = parse("A = one\n\nB=two=2\n!!! trailer\nC=ignored\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(" one"));
        assert_eq!(table.get("B"), Some("two=2"));
        assert_eq!(table.get("C"), None);
        assert_eq!(table.cut_line(), 3);
        assert_eq!(table.tail_lines(), &["!!! trailer", "C=ignored", ""]);
    }

    #[test]
    fn indented_marker_still_cuts() {
        let table = parse("A=1\n   !!!\n").unwrap();
        assert_eq!(table.cut_line(), 1);
        assert_eq!(table.tail_lines()[0], "   !!!");
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let table = parse(" \t \nA=1\n\t\n!!!").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cut_line(), 3);
    }

    #[test]
    fn line_without_separator_is_malformed() {
        let result = parse("A=1\nbogus line no equals\n!!!");
        assert_eq!(result, Err(ParseError::Malformed { line: 1 }));
    }

    #[test]
    fn missing_marker_is_unterminated() {
        assert_eq!(parse("A=1\nB=2\n"), Err(ParseError::Unterminated));
        assert_eq!(parse(""), Err(ParseError::Unterminated));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let table = parse("K=first\nK =second\n!!!").unwrap();
        assert_eq!(table.get("K"), Some("second"));
        assert_eq!(table.duplicates().len(), 1);
    }

    #[test]
    fn value_is_not_trimmed_or_unescaped() {
        let table = parse("K=  a\\nb  \n!!!").unwrap();
        assert_eq!(table.get("K"), Some("  a\\nb  "));
    }

    #[test]
    fn errors_render_one_based_lines() {
        let error = ParseError::Malformed { line: 4 };
        assert_eq!(error.to_string(), "line 5 is missing the `=` separator");
        assert_eq!(error.to_diagnostic(10).line, 4);
        assert_eq!(ParseError::Unterminated.to_diagnostic(10).line, 9);
        assert_eq!(ParseError::Unterminated.to_diagnostic(0).line, 0);
    }
}
