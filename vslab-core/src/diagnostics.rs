//! Structured diagnostics for editor and CLI consumption
//!
//! Diagnostics are line based: every check in this crate works on whole lines, so a
//! diagnostic carries the 0-based line it refers to rather than a full range. Hosts widen
//! it to whatever span their protocol needs.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels matching LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 0-based line index.
    pub line: usize,
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, severity: Severity, code: &'static str, message: String) -> Self {
        Self {
            line,
            severity,
            code,
            message,
        }
    }

    pub fn error(line: usize, code: &'static str, message: impl Into<String>) -> Self {
        Self::new(line, Severity::Error, code, message.into())
    }

    pub fn warning(line: usize, code: &'static str, message: impl Into<String>) -> Self {
        Self::new(line, Severity::Warning, code, message.into())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}]: {}",
            self.line + 1,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// True when any diagnostic in the slice is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
