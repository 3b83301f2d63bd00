//! Generated constants listing
//!
//! Renders the table as a static container of string constants, one per key in sorted
//! order. The namespace and container names come from [`ExportOptions`] so the layout of
//! any particular consuming project stays out of the core. Values are written between
//! double quotes as-is: escape sequences in the localization file are already in the
//! target language's syntax.

use super::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Dotted namespace path, e.g. `GameLogic.Localization`.
    pub namespace: String,
    /// Name of the static container holding the constants.
    pub container: String,
    /// One level of indentation.
    pub indent: String,
}

impl ExportOptions {
    pub fn new(namespace: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            container: container.into(),
            ..Self::default()
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            namespace: "GameLogic.Localization".to_string(),
            container: "LS".to_string(),
            indent: "    ".to_string(),
        }
    }
}

pub fn export_constants(table: &Table, options: &ExportOptions) -> Vec<String> {
    let indent = options.indent.as_str();
    let mut lines = vec![
        format!("namespace {}", options.namespace),
        "{".to_string(),
        format!("{indent}public static class {}", options.container),
        format!("{indent}{{"),
    ];

    for entry in table.sorted_entries() {
        lines.push(format!(
            "{indent}{indent}public const string {} = \"{}\";",
            entry.key, entry.value
        ));
    }

    lines.push(format!("{indent}}}"));
    lines.push("}".to_string());
    lines
}
