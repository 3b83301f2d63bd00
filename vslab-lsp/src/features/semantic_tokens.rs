use lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};
use vslab_core::highlight::{tokenize_text, Token, TOKEN_MODIFIERS, TOKEN_TYPES};

/// Legend advertised during `initialize`. Token codes index into it.
pub fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES
            .iter()
            .map(|name| SemanticTokenType::new(*name))
            .collect(),
        token_modifiers: TOKEN_MODIFIERS
            .iter()
            .map(|name| SemanticTokenModifier::new(*name))
            .collect(),
    }
}

pub fn collect_semantic_tokens(text: &str, highlight_placeholders: bool) -> Vec<Token> {
    tokenize_text(text, highlight_placeholders)
}

/// Delta-encode tokens for the wire.
///
/// Tokens must be ordered by line and start column and never span lines, which is what the
/// tokenizer produces.
pub fn encode_semantic_tokens(tokens: &[Token]) -> Vec<SemanticToken> {
    let mut data = Vec::with_capacity(tokens.len());
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in tokens {
        let line = token.line as u32;
        let start = token.start as u32;
        let delta_line = line.saturating_sub(prev_line);
        let delta_start = if delta_line == 0 {
            start.saturating_sub(prev_start)
        } else {
            start
        };
        data.push(SemanticToken {
            delta_line,
            delta_start,
            length: token.length as u32,
            token_type: token.category.code(),
            token_modifiers_bitset: 0,
        });
        prev_line = line;
        prev_start = start;
    }

    data
}
