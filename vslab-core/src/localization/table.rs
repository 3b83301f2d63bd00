//! Parsed localization table

use crate::text::utf16_len;
use indexmap::IndexMap;
use serde::Serialize;

/// One `key=value` pair. `value` is kept exactly as written after the separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// 0-based source line of the occurrence that won.
    pub line: usize,
}

/// A key that appeared more than once. The later occurrence replaced the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub key: String,
    pub first_line: usize,
    pub line: usize,
}

/// Entries in insertion order plus the verbatim trailer that starts at the cut line.
///
/// Insertion order is only kept for diagnostics; every output path iterates
/// [`Table::sorted_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    entries: IndexMap<String, Entry>,
    cut_line: usize,
    tail_lines: Vec<String>,
    duplicates: Vec<DuplicateKey>,
}

impl Table {
    /// Insert or overwrite an entry; the last write wins and the collision is recorded.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        line: usize,
    ) -> Option<Entry> {
        let key = key.into();
        let entry = Entry {
            key: key.clone(),
            value: value.into(),
            line,
        };
        let previous = self.entries.insert(key.clone(), entry);
        if let Some(previous) = &previous {
            self.duplicates.push(DuplicateKey {
                key,
                first_line: previous.line,
                line,
            });
        }
        previous
    }

    pub(crate) fn terminate(&mut self, cut_line: usize, tail_lines: Vec<String>) {
        self.cut_line = cut_line;
        self.tail_lines = tail_lines;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their keys were first seen.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entries ordered by key, compared ordinally.
    pub fn sorted_entries(&self) -> Vec<&Entry> {
        let mut sorted: Vec<&Entry> = self.entries.values().collect();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));
        sorted
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn cut_line(&self) -> usize {
        self.cut_line
    }

    pub fn tail_lines(&self) -> &[String] {
        &self.tail_lines
    }

    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }

    /// Width of the longest key in UTF-16 code units; 0 for an empty table.
    pub fn key_width(&self) -> usize {
        self.entries
            .keys()
            .map(|key| utf16_len(key))
            .max()
            .unwrap_or(0)
    }
}
