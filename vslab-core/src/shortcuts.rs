//! Shortcut aggregation across tool documents
//!
//! Each source is an optional tool document plus the seed map it is resolved with. Sources
//! are visited in order; a source whose file does not exist is skipped, and the `shortcuts`
//! sections of the others are concatenated as they appear. Entries without a `uri` are
//! dropped and nothing is de-duplicated.
//!
//! [`aggregate_layered`] additionally feeds every source the references resolved by the one
//! before it, so an override document can build on names declared in the base document.

use crate::references::{parse_document, resolve, scalar_text, ReferenceMap, ResolveError};
use serde::Serialize;
use serde_yaml::Value;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const SHORTCUTS_KEY: &str = "shortcuts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutEntry {
    /// `desc` when present, the target otherwise.
    pub label: String,
    /// URI or file system path, exactly as resolved.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSource {
    pub path: PathBuf,
    pub seed: ReferenceMap,
}

impl ShortcutSource {
    pub fn new(path: impl Into<PathBuf>, seed: ReferenceMap) -> Self {
        Self {
            path: path.into(),
            seed,
        }
    }
}

/// Where source documents come from.
pub trait SourceReader {
    /// `Ok(None)` when the source does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Reads sources from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to resolve {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        source: ResolveError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layering {
    Independent,
    Inherited,
}

/// Resolve every source with its own seed and concatenate the shortcuts.
pub fn aggregate<R>(
    sources: &[ShortcutSource],
    reader: &R,
) -> Result<Vec<ShortcutEntry>, AggregateError>
where
    R: SourceReader + ?Sized,
{
    collect(sources, reader, Layering::Independent)
}

/// Like [`aggregate`], but each source also sees the references of the previous one.
/// A source's own seed wins over inherited names.
pub fn aggregate_layered<R>(
    sources: &[ShortcutSource],
    reader: &R,
) -> Result<Vec<ShortcutEntry>, AggregateError>
where
    R: SourceReader + ?Sized,
{
    collect(sources, reader, Layering::Inherited)
}

fn collect<R>(
    sources: &[ShortcutSource],
    reader: &R,
    layering: Layering,
) -> Result<Vec<ShortcutEntry>, AggregateError>
where
    R: SourceReader + ?Sized,
{
    let mut entries = Vec::new();
    let mut inherited = ReferenceMap::new();

    for source in sources {
        let path = &source.path;
        let text = reader
            .read(path)
            .map_err(|err| AggregateError::Read {
                path: path.clone(),
                source: err,
            })?;
        let Some(text) = text else {
            debug!(path = %path.display(), "shortcut source missing, skipping");
            continue;
        };

        let seed = match layering {
            Layering::Independent => source.seed.clone(),
            Layering::Inherited => {
                let mut seed = inherited.clone();
                seed.extend(source.seed.clone());
                seed
            }
        };

        let resolve_err = |err: ResolveError| AggregateError::Resolve {
            path: path.clone(),
            source: err,
        };
        let resolved = resolve(&text, &seed).map_err(resolve_err)?;
        let found = shortcuts_from_text(&resolved.text).map_err(resolve_err)?;
        debug!(path = %path.display(), count = found.len(), "collected shortcuts");

        entries.extend(found);
        inherited = resolved.map;
    }

    Ok(entries)
}

/// Read the `shortcuts` section of an already resolved document.
pub fn shortcuts_from_text(text: &str) -> Result<Vec<ShortcutEntry>, ResolveError> {
    let document = parse_document(text)?;
    Ok(shortcuts_from_document(&document))
}

pub fn shortcuts_from_document(document: &Value) -> Vec<ShortcutEntry> {
    document
        .get(SHORTCUTS_KEY)
        .and_then(Value::as_sequence)
        .map(|items| items.iter().filter_map(shortcut_entry).collect())
        .unwrap_or_default()
}

fn shortcut_entry(item: &Value) -> Option<ShortcutEntry> {
    let target = item
        .get("uri")
        .and_then(Value::as_str)
        .filter(|uri| !uri.is_empty())?;
    let label = item
        .get("desc")
        .and_then(scalar_text)
        .unwrap_or_else(|| target.to_string());
    Some(ShortcutEntry {
        label,
        target: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryReader {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryReader {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.files.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl SourceReader for MemoryReader {
        fn read(&self, path: &Path) -> io::Result<Option<String>> {
            Ok(self.files.get(path).cloned())
        }
    }

    struct FailingReader;

    impl SourceReader for FailingReader {
        fn read(&self, _: &Path) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn root_seed() -> ReferenceMap {
        ReferenceMap::from([("ROOT".to_string(), "/work".to_string())])
    }

    #[test]
    fn missing_sources_are_skipped() {
        let reader = MemoryReader::default().with(
            "b.yaml",
            "shortcuts:\n  - uri: ${ROOT}/docs\n    desc: Docs\n",
        );
        let sources = vec![
            ShortcutSource::new("a.yaml", root_seed()),
            ShortcutSource::new("b.yaml", root_seed()),
        ];

        let entries = aggregate(&sources, &reader).unwrap();
        assert_eq!(
            entries,
            vec![ShortcutEntry {
                label: "Docs".into(),
                target: "/work/docs".into()
            }]
        );
    }

    #[test]
    fn label_falls_back_to_uri_and_empty_uris_are_dropped() {
        let text = "shortcuts:\n  - uri: /a\n  - uri: ''\n    desc: nothing\n  - desc: no uri\n  - uri: /b\n    desc: B\n";
        let entries = shortcuts_from_text(text).unwrap();
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|entry| (entry.label.as_str(), entry.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("/a", "/a"), ("B", "/b")]);
    }

    #[test]
    fn scalar_descriptions_become_labels() {
        let text = "shortcuts:\n  - uri: /n\n    desc: 42\n  - uri: /t\n    desc: true\n  - uri: /l\n    desc: [x]\n";
        let labels: Vec<String> = shortcuts_from_text(text)
            .unwrap()
            .into_iter()
            .map(|entry| entry.label)
            .collect();
        assert_eq!(labels, vec!["42", "true", "/l"]);
    }

    #[test]
    fn sources_concatenate_in_order_without_dedup() {
        let reader = MemoryReader::default()
            .with("one", "shortcuts:\n  - uri: /x\n  - uri: /y\n")
            .with("two", "shortcuts:\n  - uri: /x\n");
        let sources = vec![
            ShortcutSource::new("one", ReferenceMap::new()),
            ShortcutSource::new("two", ReferenceMap::new()),
        ];
        let targets: Vec<String> = aggregate(&sources, &reader)
            .unwrap()
            .into_iter()
            .map(|entry| entry.target)
            .collect();
        assert_eq!(targets, vec!["/x", "/y", "/x"]);
    }

    #[test]
    fn layered_sources_inherit_previous_references() {
        let reader = MemoryReader::default()
            .with("base", "references:\n  - TOOLS: ${ROOT}/tools\n")
            .with("override", "shortcuts:\n  - uri: ${TOOLS}/bin\n");
        let sources = vec![
            ShortcutSource::new("base", root_seed()),
            ShortcutSource::new("override", ReferenceMap::new()),
        ];

        let independent = aggregate(&sources, &reader).unwrap();
        assert_eq!(independent[0].target, "${TOOLS}/bin");

        let layered = aggregate_layered(&sources, &reader).unwrap();
        assert_eq!(layered[0].target, "/work/tools/bin");
    }

    #[test]
    fn document_without_section_contributes_nothing() {
        assert!(shortcuts_from_text("other: 1\n").unwrap().is_empty());
        assert!(shortcuts_from_text("").unwrap().is_empty());
    }

    #[test]
    fn read_failures_name_the_path() {
        let sources = vec![ShortcutSource::new("locked.yaml", ReferenceMap::new())];
        let err = aggregate(&sources, &FailingReader).unwrap_err();
        assert!(matches!(err, AggregateError::Read { .. }));
        assert!(err.to_string().contains("locked.yaml"));
    }
}
