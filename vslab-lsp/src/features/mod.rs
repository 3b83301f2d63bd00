pub mod commands;
pub mod diagnostics;
pub mod formatting;
pub mod semantic_tokens;
