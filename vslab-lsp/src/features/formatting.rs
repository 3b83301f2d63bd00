use lsp_types::{Position, Range, TextEdit};
use similar::{Algorithm, ChangeTag, TextDiff};
use vslab_core::localization::format_source;

/// Text edit expressed as byte offsets over the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSpan {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

/// Edits turning `source` into its canonical form. A document that does not parse gets none.
pub fn format_document(source: &str) -> Vec<TextEditSpan> {
    match format_source(source) {
        Ok(formatted) => compute_edits(source, &formatted),
        Err(_) => Vec::new(),
    }
}

/// Line-granular edits from `original` to `formatted`. Adjacent changed lines are merged
/// into one edit.
pub fn compute_edits(original: &str, formatted: &str) -> Vec<TextEditSpan> {
    if original == formatted {
        return Vec::new();
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, formatted);

    let line_offsets = compute_line_offsets(original);
    let mut edits = Vec::new();
    let mut builder: Option<EditBuilder> = None;
    let mut cursor = 0usize;

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => {
                cursor += 1;
                flush_builder(&mut builder, &mut edits);
            }
            ChangeTag::Delete => {
                let start = offset_for_line(cursor, &line_offsets, original.len());
                let end = offset_for_line(cursor + 1, &line_offsets, original.len());
                cursor += 1;
                extend_delete(&mut builder, &mut edits, start, end);
            }
            ChangeTag::Insert => {
                let offset = offset_for_line(cursor, &line_offsets, original.len());
                let text = change.value();
                if !text.is_empty() {
                    extend_insert(&mut builder, &mut edits, offset, text);
                }
            }
        }
    }

    flush_builder(&mut builder, &mut edits);
    edits
}

/// Convert byte spans into protocol edits with UTF-16 positions.
pub fn to_text_edits(source: &str, spans: &[TextEditSpan]) -> Vec<TextEdit> {
    spans
        .iter()
        .map(|span| TextEdit {
            range: Range {
                start: offset_to_position(source, span.start),
                end: offset_to_position(source, span.end),
            },
            new_text: span.new_text.clone(),
        })
        .collect()
}

/// Position of a byte offset. `\r\n`, `\r` and `\n` all end a line, as they do for the
/// parser and the line diff.
pub fn offset_to_position(source: &str, offset: usize) -> Position {
    let mut line = 0u32;
    let mut character = 0u32;
    let mut chars = source.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if idx >= offset {
            break;
        }
        match ch {
            '\r' if matches!(chars.peek(), Some((_, '\n'))) => {}
            '\r' | '\n' => {
                line += 1;
                character = 0;
            }
            _ => character += ch.len_utf16() as u32,
        }
    }
    Position::new(line, character)
}

fn extend_delete(
    builder: &mut Option<EditBuilder>,
    edits: &mut Vec<TextEditSpan>,
    start: usize,
    end: usize,
) {
    match builder {
        Some(current) if start > current.end => {
            flush_builder(builder, edits);
            *builder = Some(EditBuilder::new(start, end));
        }
        Some(current) => current.end = current.end.max(end),
        None => *builder = Some(EditBuilder::new(start, end)),
    }
}

fn extend_insert(
    builder: &mut Option<EditBuilder>,
    edits: &mut Vec<TextEditSpan>,
    offset: usize,
    text: &str,
) {
    if let Some(current) = builder {
        if offset < current.start || offset > current.end {
            flush_builder(builder, edits);
        }
    }
    let edit = builder.get_or_insert_with(|| EditBuilder::new(offset, offset));
    edit.new_text.push_str(text);
}

fn flush_builder(builder: &mut Option<EditBuilder>, edits: &mut Vec<TextEditSpan>) {
    if let Some(edit) = builder.take() {
        edits.push(TextEditSpan {
            start: edit.start,
            end: edit.end,
            new_text: edit.new_text,
        });
    }
}

fn compute_line_offsets(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut offsets = vec![0];
    for (idx, byte) in bytes.iter().enumerate() {
        match byte {
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => {}
            b'\r' | b'\n' => offsets.push(idx + 1),
            _ => {}
        }
    }
    offsets
}

fn offset_for_line(line: usize, offsets: &[usize], text_len: usize) -> usize {
    offsets.get(line).copied().unwrap_or(text_len)
}

struct EditBuilder {
    start: usize,
    end: usize,
    new_text: String,
}

impl EditBuilder {
    fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            new_text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn apply_spans(source: &str, edits: &[TextEditSpan]) -> String {
        let mut result = source.to_string();
        let mut sorted = edits.to_vec();
        sorted.sort_by_key(|edit| edit.start);
        for edit in sorted.into_iter().rev() {
            result.replace_range(edit.start..edit.end, &edit.new_text);
        }
        result
    }

    #[test]
    fn formats_entire_document() {
        let source = "Zeta=last\nAlpha=first\n!!! tail\nfree text\n";
        let formatted = format_source(source).unwrap();
        let edits = format_document(source);

        assert!(!edits.is_empty());
        assert_eq!(apply_spans(source, &edits), formatted);
    }

    #[test]
    fn no_edits_when_already_formatted() {
        let source = "A=1\nB=2\n\n\n\n\n!!!";
        assert!(format_document(source).is_empty());
    }

    #[test]
    fn unparseable_documents_are_left_alone() {
        assert!(format_document("A=1\nno separator\n!!!").is_empty());
        assert!(format_document("A=1\n").is_empty());
    }

    #[test]
    fn positions_count_utf16_units() {
        let source = "é=1\n😀=2\n";
        assert_eq!(offset_to_position(source, 0), Position::new(0, 0));
        assert_eq!(offset_to_position(source, "é=".len()), Position::new(0, 2));
        assert_eq!(offset_to_position(source, "é=1\n😀".len()), Position::new(1, 2));
        assert_eq!(offset_to_position(source, source.len()), Position::new(2, 0));
    }

    #[test]
    fn positions_follow_every_line_ending() {
        let source = "A=1\rB=2\r\nC=3";
        assert_eq!(offset_to_position(source, "A=1\r".len()), Position::new(1, 0));
        assert_eq!(offset_to_position(source, "A=1\rB=2".len()), Position::new(1, 3));
        assert_eq!(offset_to_position(source, "A=1\rB=2\r\n".len()), Position::new(2, 0));
        assert_eq!(compute_line_offsets(source), vec![0, 4, 9]);
    }

    #[rstest]
    #[case::carriage_returns("\r")]
    #[case::crlf("\r\n")]
    #[case::newlines("\n")]
    fn trailer_survives_formatting(#[case] ending: &str) {
        let source = ["Zeta=z", "Alpha=a", "!!! tail", "more"].join(ending);
        let formatted = format_source(&source).unwrap();
        assert!(formatted.ends_with("!!! tail\nmore"));

        let edits = format_document(&source);
        assert_eq!(apply_spans(&source, &edits), formatted);
    }

    #[test]
    fn text_edits_cover_the_spans() {
        let source = "B=2\nA=1\n!!!";
        let spans = format_document(source);
        let edits = to_text_edits(source, &spans);
        assert_eq!(edits.len(), spans.len());
        assert!(edits.iter().all(|edit| edit.range.start <= edit.range.end));
    }

    proptest! {
        #[test]
        fn applying_edits_yields_the_formatted_text(
            pairs in prop::collection::vec(("[A-Za-z][A-Za-z0-9_]{0,6}", "[a-z {}0-9]{0,8}"), 0..8),
            blanks in 0usize..6,
            tail in "[a-z =]{0,10}",
            ending in prop_oneof![Just("\n"), Just("\r\n"), Just("\r")],
        ) {
            let mut source: String = pairs
                .iter()
                .map(|(key, value)| format!("{key}={value}{ending}"))
                .collect();
            source.push_str(&ending.repeat(blanks));
            source.push_str("!!!");
            source.push_str(&tail);

            let formatted = format_source(&source).unwrap();
            let edits = format_document(&source);
            prop_assert_eq!(apply_spans(&source, &edits), formatted);
        }
    }
}
