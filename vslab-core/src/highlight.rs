//! Semantic highlighting for localization files
//!
//! The tokenizer is deliberately independent from the strict parser: it classifies every
//! line on its own and never fails, so an editor keeps painting while the user is in the
//! middle of typing a malformed line.

pub mod legend;
pub mod tokenizer;

pub use legend::{encode_token_modifiers, encode_token_type, TOKEN_MODIFIERS, TOKEN_TYPES};
pub use tokenizer::{tokenize, tokenize_text, Token, TokenCategory, TOKEN_CATEGORIES};
