//! Semantic token legend
//!
//! The legend is the fixed list of token type and modifier names an editor is told about
//! once; tokens then refer to types by index and to modifiers by bit. Both lookups are
//! built on first use and never change afterwards.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const TOKEN_TYPES: &[&str] = &[
    "comment",
    "string",
    "keyword",
    "number",
    "regexp",
    "operator",
    "namespace",
    "type",
    "struct",
    "class",
    "interface",
    "enum",
    "typeParameter",
    "function",
    "method",
    "macro",
    "variable",
    "parameter",
    "property",
    "label",
];

pub const TOKEN_MODIFIERS: &[&str] = &[
    "declaration",
    "documentation",
    "readonly",
    "static",
    "abstract",
    "deprecated",
    "modification",
    "async",
];

static TOKEN_TYPE_CODES: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| index_of(TOKEN_TYPES));
static TOKEN_MODIFIER_BITS: Lazy<HashMap<&'static str, u32>> =
    Lazy::new(|| index_of(TOKEN_MODIFIERS));

fn index_of(names: &[&'static str]) -> HashMap<&'static str, u32> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| (*name, index as u32))
        .collect()
}

/// Legend index of a token type; unknown names fall back to 0.
pub fn encode_token_type(name: &str) -> u32 {
    TOKEN_TYPE_CODES.get(name).copied().unwrap_or(0)
}

/// Bit set of token modifiers; unknown names are ignored.
pub fn encode_token_modifiers<S: AsRef<str>>(names: &[S]) -> u32 {
    names
        .iter()
        .filter_map(|name| TOKEN_MODIFIER_BITS.get(name.as_ref()))
        .fold(0, |bits, index| bits | (1 << index))
}
