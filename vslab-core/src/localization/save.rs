//! Save pipeline
//!
//! Parses once and produces every derived artifact the host asked for. Each output is
//! gated independently; nothing is produced when the parse fails.

use super::exporter::{export_constants, ExportOptions};
use super::formatter::format_text;
use super::parser::{parse, ParseError};
use super::validation::validate;
use crate::diagnostics::Diagnostic;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Produce the canonical formatting.
    pub format: bool,
    /// Produce the constants listing with these wrapper options.
    pub export: Option<ExportOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutput {
    pub formatted: Option<String>,
    pub exported: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SaveOutput {
    /// The formatted text, only when it differs from `original`.
    pub fn formatting_change(&self, original: &str) -> Option<&str> {
        self.formatted
            .as_deref()
            .filter(|formatted| *formatted != original)
    }
}

pub fn on_save(source: &str, options: &SaveOptions) -> Result<SaveOutput, ParseError> {
    let table = parse(source)?;
    let formatted = options.format.then(|| format_text(&table));
    let exported = options
        .export
        .as_ref()
        .map(|export| export_constants(&table, export).join("\n"));

    debug!(
        formatted = formatted.is_some(),
        exported = exported.is_some(),
        "localization save pipeline finished"
    );

    Ok(SaveOutput {
        formatted,
        exported,
        diagnostics: validate(&table),
    })
}
