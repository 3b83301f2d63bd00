//! Per-line semantic tokenizer
//!
//!     Every line is classified independently:
//!
//!         !!! anything          -> Comment over the whole line
//!         key=value             -> KeyRegion over `key`, then the value region
//!         no separator / blank  -> nothing
//!
//!     With placeholder highlighting off the value region is a single LiteralText token.
//!     With it on, the value region is scanned by a two-state machine:
//!
//!         Text         `\n`  -> flush literal, emit EscapeSequence (2 columns)
//!                      `{`   -> remember position, switch to Placeholder
//!         Placeholder  `}`   -> flush literal up to the `{`, emit Placeholder `{...}`,
//!                               switch back to Text
//!
//!     Escapes are only recognised in Text, and a `{` inside an open placeholder is plain
//!     content. Whatever is left after the last flush point at end of line is LiteralText,
//!     which is how an unclosed `{...` ends up rendered as text.
//!
//!     Columns are UTF-16 code units so tokens can be handed to an editor unchanged.

use super::legend;
use crate::localization::parser::{is_cut_line, SEPARATOR};
use crate::text::split_lines;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenCategory {
    Comment,
    KeyRegion,
    LiteralText,
    EscapeSequence,
    Placeholder,
}

impl TokenCategory {
    /// Semantic token type name from the standard legend.
    ///
    /// Keys are painted as keywords and values as strings, the two colours every theme
    /// defines. Escapes borrow `regexp` and placeholders `variable` so they stand out
    /// inside the string colour.
    pub fn token_type(self) -> &'static str {
        match self {
            TokenCategory::Comment => "comment",
            TokenCategory::KeyRegion => "keyword",
            TokenCategory::LiteralText => "string",
            TokenCategory::EscapeSequence => "regexp",
            TokenCategory::Placeholder => "variable",
        }
    }

    /// Index of [`Self::token_type`] in the legend.
    pub fn code(self) -> u32 {
        legend::encode_token_type(self.token_type())
    }
}

pub const TOKEN_CATEGORIES: &[TokenCategory] = &[
    TokenCategory::Comment,
    TokenCategory::KeyRegion,
    TokenCategory::LiteralText,
    TokenCategory::EscapeSequence,
    TokenCategory::Placeholder,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    /// 0-based line.
    pub line: usize,
    /// Start column in UTF-16 code units.
    pub start: usize,
    /// Length in UTF-16 code units, never zero.
    pub length: usize,
    pub category: TokenCategory,
}

impl Token {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Text,
    Placeholder { open: usize },
}

pub fn tokenize<S: AsRef<str>>(lines: &[S], highlight_placeholders: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        LineScanner {
            line: index,
            tokens: &mut tokens,
        }
        .scan(line.as_ref(), highlight_placeholders);
    }
    tokens
}

pub fn tokenize_text(text: &str, highlight_placeholders: bool) -> Vec<Token> {
    tokenize(&split_lines(text), highlight_placeholders)
}

struct LineScanner<'a> {
    line: usize,
    tokens: &'a mut Vec<Token>,
}

impl LineScanner<'_> {
    fn push(&mut self, start: usize, end: usize, category: TokenCategory) {
        if end > start {
            self.tokens.push(Token {
                line: self.line,
                start,
                length: end - start,
                category,
            });
        }
    }

    fn scan(mut self, text: &str, highlight_placeholders: bool) {
        if text.trim().is_empty() {
            return;
        }

        let columns = utf16_columns(text);
        let line_end = columns
            .last()
            .map(|(column, ch)| column + ch.len_utf16())
            .unwrap_or(0);

        if is_cut_line(text) {
            self.push(0, line_end, TokenCategory::Comment);
            return;
        }

        let Some(eq) = columns.iter().position(|(_, ch)| *ch == SEPARATOR) else {
            return;
        };
        let eq_column = columns[eq].0;
        self.push(0, eq_column, TokenCategory::KeyRegion);

        let value = &columns[eq + 1..];
        let value_start = eq_column + 1;
        if highlight_placeholders {
            self.scan_value(value, value_start, line_end);
        } else {
            self.push(value_start, line_end, TokenCategory::LiteralText);
        }
    }

    fn scan_value(&mut self, value: &[(usize, char)], value_start: usize, line_end: usize) {
        let mut state = ScanState::Text;
        let mut flush = value_start;
        let mut idx = 0;

        while idx < value.len() {
            let (column, ch) = value[idx];
            match state {
                ScanState::Text => {
                    let escape = ch == '\\' && matches!(value.get(idx + 1), Some((_, 'n')));
                    if escape {
                        self.push(flush, column, TokenCategory::LiteralText);
                        self.push(column, column + 2, TokenCategory::EscapeSequence);
                        flush = column + 2;
                        idx += 2;
                        continue;
                    }
                    if ch == '{' {
                        state = ScanState::Placeholder { open: column };
                    }
                }
                ScanState::Placeholder { open } => {
                    if ch == '}' {
                        self.push(flush, open, TokenCategory::LiteralText);
                        self.push(open, column + 1, TokenCategory::Placeholder);
                        flush = column + 1;
                        state = ScanState::Text;
                    }
                }
            }
            idx += 1;
        }

        self.push(flush, line_end, TokenCategory::LiteralText);
    }
}

/// Pair every char with its starting UTF-16 column.
fn utf16_columns(text: &str) -> Vec<(usize, char)> {
    let mut column = 0;
    text.chars()
        .map(|ch| {
            let start = column;
            column += ch.len_utf16();
            (start, ch)
        })
        .collect()
}
