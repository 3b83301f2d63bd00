//! Subcommand implementations
//!
//! Every command reads its input, runs the matching vslab-core operation and returns the
//! text to print. Failures come back as a ready-to-print message; `main` decides the exit
//! code.

use std::fs;
use std::path::Path;
use tracing::debug;
use vslab_config::VslabConfig;
use vslab_core::convert::{json_to_yaml, yaml_to_json};
use vslab_core::diagnostics::has_errors;
use vslab_core::events::export_events;
use vslab_core::highlight::tokenize_text;
use vslab_core::localization::{export_constants, format_text, parse, validate};
use vslab_core::references::{resolve, ReferenceMap};
use vslab_core::shortcuts::{aggregate, aggregate_layered, FsReader};
use vslab_core::text::split_lines;

/// Target formats accepted by `convert --to`.
pub const CONVERT_TARGETS: &[&str] = &["json", "yaml"];

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn write(path: &Path, text: &str) -> Result<(), String> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    }
    fs::write(path, text).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Print to stdout, or write to `output` and report where.
fn emit(text: String, output: Option<&Path>) -> Result<String, String> {
    match output {
        Some(path) => {
            write(path, &text)?;
            Ok(format!("Wrote {}\n", path.display()))
        }
        None => Ok(text + "\n"),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|json| json + "\n")
        .map_err(|e| format!("JSON serialization failed: {}", e))
}

/// Parse and validate. `Err` when the file does not parse or has error diagnostics.
pub fn check(path: &Path) -> Result<String, String> {
    let source = read(path)?;
    let table = parse(&source).map_err(|e| {
        let diagnostic = e.to_diagnostic(split_lines(&source).len());
        format!("{}: {}", path.display(), diagnostic)
    })?;

    let diagnostics = validate(&table);
    debug!(entries = table.len(), diagnostics = diagnostics.len(), "checked table");
    if diagnostics.is_empty() {
        return Ok(format!("{}: ok ({} entries)\n", path.display(), table.len()));
    }

    let report: String = diagnostics
        .iter()
        .map(|diagnostic| format!("{}: {}\n", path.display(), diagnostic))
        .collect();
    if has_errors(&diagnostics) {
        Err(report.trim_end().to_string())
    } else {
        Ok(report)
    }
}

/// Canonical text on stdout, or rewritten in place with `write_back`.
pub fn format(path: &Path, write_back: bool) -> Result<String, String> {
    let source = read(path)?;
    let table = parse(&source).map_err(|e| format!("{}: {}", path.display(), e))?;
    let formatted = format_text(&table);

    if !write_back {
        return Ok(formatted);
    }
    if formatted == source {
        return Ok(format!("{} already formatted\n", path.display()));
    }
    write(path, &formatted)?;
    Ok(format!("Formatted {}\n", path.display()))
}

pub fn export(path: &Path, config: &VslabConfig, output: Option<&Path>) -> Result<String, String> {
    let source = read(path)?;
    let table = parse(&source).map_err(|e| format!("{}: {}", path.display(), e))?;
    let listing = export_constants(&table, &config.export_options()).join("\n");
    emit(listing, output)
}

pub fn tokens(path: &Path, config: &VslabConfig) -> Result<String, String> {
    let source = read(path)?;
    let tokens = tokenize_text(&source, config.localization.semantic_highlight);
    to_json(&tokens)
}

/// Parse `NAME=VALUE` seed arguments.
pub fn parse_seeds<'a, I>(seeds: I) -> Result<ReferenceMap, String>
where
    I: IntoIterator<Item = &'a String>,
{
    seeds
        .into_iter()
        .map(|seed| {
            seed.split_once('=')
                .map(|(name, value)| (name.trim().to_string(), value.to_string()))
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| format!("Invalid seed '{}', expected NAME=VALUE", seed))
        })
        .collect()
}

/// Resolved document text, or the final reference map as JSON with `show_map`.
pub fn resolve_references(
    path: &Path,
    seed: &ReferenceMap,
    show_map: bool,
) -> Result<String, String> {
    let source = read(path)?;
    let resolved = resolve(&source, seed).map_err(|e| format!("{}: {}", path.display(), e))?;
    if show_map {
        to_json(&resolved.map)
    } else {
        Ok(resolved.text)
    }
}

pub fn shortcuts(root: &Path, config: &VslabConfig, layered: bool) -> Result<String, String> {
    let sources = config.shortcut_sources(root);
    let entries = if layered {
        aggregate_layered(&sources, &FsReader)
    } else {
        aggregate(&sources, &FsReader)
    }
    .map_err(|e| e.to_string())?;
    to_json(&entries)
}

pub fn events(path: &Path, config: &VslabConfig, output: Option<&Path>) -> Result<String, String> {
    let source = read(path)?;
    let listing = export_events(&source, &config.events_options())
        .map_err(|e| format!("{}: {}", path.display(), e))?
        .join("\n");
    emit(listing, output)
}

pub fn convert(path: &Path, to: &str) -> Result<String, String> {
    let source = read(path)?;
    let converted = match to {
        "json" => yaml_to_json(&source).map(|json| json + "\n"),
        "yaml" => json_to_yaml(&source),
        _ => return Err(format!("Unknown target format: {}", to)),
    };
    converted.map_err(|e| format!("{}: {}", path.display(), e))
}
