use lsp_types::{DiagnosticSeverity, NumberOrString, Position, Range};
use vslab_core::localization::{parse, validate};
use vslab_core::text::{split_lines, utf16_len};
use vslab_core::{Diagnostic, Severity};

pub const DIAGNOSTIC_SOURCE: &str = "vslab";

/// Parse failure as a single error, otherwise whatever the validator reports.
pub fn collect_diagnostics(text: &str) -> Vec<Diagnostic> {
    match parse(text) {
        Ok(table) => validate(&table),
        Err(err) => vec![err.to_diagnostic(split_lines(text).len())],
    }
}

/// Convert to the protocol shape. Each diagnostic covers its whole line.
pub fn to_lsp_diagnostics(text: &str, diagnostics: &[Diagnostic]) -> Vec<lsp_types::Diagnostic> {
    let lines = split_lines(text);
    diagnostics
        .iter()
        .map(|diagnostic| {
            let width = lines
                .get(diagnostic.line)
                .map(|line| utf16_len(line))
                .unwrap_or(0);
            let line = diagnostic.line as u32;
            lsp_types::Diagnostic {
                range: Range::new(Position::new(line, 0), Position::new(line, width as u32)),
                severity: Some(to_lsp_severity(diagnostic.severity)),
                code: Some(NumberOrString::String(diagnostic.code.to_string())),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message: diagnostic.message.clone(),
                ..lsp_types::Diagnostic::default()
            }
        })
        .collect()
}

fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}
