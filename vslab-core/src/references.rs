//! Reference resolution for tool documents
//!
//!     A tool document may declare named templates in a `references` section:
//!
//!         references:
//!           - BASE: ${ROOT}/Client
//!           - ASSETS: ${BASE}/Assets
//!         shortcuts:
//!           - uri: ${ASSETS}/Res
//!
//!     Resolution is a single forward pass. The working map starts as the caller's seed,
//!     each reference is expanded against what is known so far and then added under its own
//!     name, and finally the whole raw text is expanded once with the finished map. A
//!     `${name}` that is unknown at the point it is expanded stays in the text literally, so
//!     forward and cyclic references surface as unexpanded placeholders instead of errors.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Name -> resolved value.
pub type ReferenceMap = BTreeMap<String, String>;

pub const REFERENCES_KEY: &str = "references";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub map: ReferenceMap,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid document: {0}")]
    Document(#[from] serde_yaml::Error),
}

/// Expand every `${name}` found in `map`; unknown names are left untouched.
pub fn substitute(template: &str, map: &ReferenceMap) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match map.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

pub fn resolve(raw_text: &str, seed: &ReferenceMap) -> Result<Resolved, ResolveError> {
    let document = parse_document(raw_text)?;
    let mut map = seed.clone();

    for (name, template) in reference_templates(&document) {
        let value = substitute(&template, &map);
        debug!(reference = %name, value = %value, "resolved reference");
        map.insert(name, value);
    }

    Ok(Resolved {
        text: substitute(raw_text, &map),
        map,
    })
}

pub(crate) fn parse_document(text: &str) -> Result<Value, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text)
}

/// `(name, template)` pairs of the `references` section in document order.
fn reference_templates(document: &Value) -> Vec<(String, String)> {
    match document.get(REFERENCES_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| match item.as_mapping() {
                Some(mapping) => Some(mapping_templates(mapping)),
                None => {
                    warn!("skipping reference entry that is not a mapping");
                    None
                }
            })
            .flatten()
            .collect(),
        Some(Value::Mapping(mapping)) => mapping_templates(mapping),
        Some(_) => {
            warn!("`references` is neither a sequence nor a mapping; ignoring it");
            Vec::new()
        }
    }
}

fn mapping_templates(mapping: &Mapping) -> Vec<(String, String)> {
    mapping
        .iter()
        .filter_map(|(name, template)| {
            let name = scalar_text(name)?;
            match scalar_text(template) {
                Some(template) => Some((name, template)),
                None => {
                    warn!(reference = %name, "skipping reference without a scalar template");
                    None
                }
            }
        })
        .collect()
}

/// Text of a scalar node; `None` for null, sequences and mappings.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(pairs: &[(&str, &str)]) -> ReferenceMap {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_names_only() {
        let map = seed(&[("A", "1")]);
        assert_eq!(substitute("${A}-${B}-${A}", &map), "1-${B}-1");
        assert_eq!(substitute("${}", &map), "${}");
        assert_eq!(substitute("$A {A}", &map), "$A {A}");
    }

    #[test]
    fn references_build_on_earlier_ones() {
        let text = "references:\n  - BASE: ${ROOT}/sub\n  - DEEP: ${BASE}/deep\nbody: ${DEEP}/file\n";
        let resolved = resolve(text, &seed(&[("ROOT", "/r")])).unwrap();

        assert_eq!(resolved.map["BASE"], "/r/sub");
        assert_eq!(resolved.map["DEEP"], "/r/sub/deep");
        assert!(resolved.text.contains("body: /r/sub/deep/file"));
        assert!(resolved.text.contains("- BASE: /r/sub"));
    }

    #[test]
    fn forward_references_stay_literal() {
        let text = "references:\n  - FIRST: ${SECOND}/x\n  - SECOND: two\n";
        let resolved = resolve(text, &ReferenceMap::new()).unwrap();
        assert_eq!(resolved.map["FIRST"], "${SECOND}/x");
        assert_eq!(resolved.map["SECOND"], "two");
    }

    #[test]
    fn cyclic_references_stay_literal() {
        let text = "references:\n  - A: ${B}\n  - B: ${A}\n";
        let resolved = resolve(text, &ReferenceMap::new()).unwrap();
        assert_eq!(resolved.map["A"], "${B}");
        assert_eq!(resolved.map["B"], "${B}");
    }

    #[test]
    fn seed_can_be_shadowed_by_a_reference() {
        let text = "references:\n  - ROOT: /override\nbody: ${ROOT}\n";
        let resolved = resolve(text, &seed(&[("ROOT", "/r")])).unwrap();
        assert!(resolved.text.ends_with("body: /override\n"));
    }

    #[test]
    fn mapping_section_and_scalar_templates() {
        let text = "references:\n  PORT: 8080\n  DEBUG: true\n  URL: http://host:${PORT}\n";
        let resolved = resolve(text, &ReferenceMap::new()).unwrap();
        assert_eq!(resolved.map["PORT"], "8080");
        assert_eq!(resolved.map["DEBUG"], "true");
        assert_eq!(resolved.map["URL"], "http://host:8080");
    }

    #[test]
    fn non_scalar_templates_are_skipped() {
        let text = "references:\n  - LIST: [1, 2]\n  - OK: yes\n";
        let resolved = resolve(text, &ReferenceMap::new()).unwrap();
        assert!(!resolved.map.contains_key("LIST"));
        assert_eq!(resolved.map["OK"], "yes");
    }

    #[test]
    fn empty_document_returns_seed() {
        let resolved = resolve("", &seed(&[("ROOT", "/r")])).unwrap();
        assert_eq!(resolved.text, "");
        assert_eq!(resolved.map, seed(&[("ROOT", "/r")]));
    }

    #[test]
    fn invalid_document_is_an_error() {
        let result = resolve("references: [unclosed", &ReferenceMap::new());
        assert!(matches!(result, Err(ResolveError::Document(_))));
    }
}
