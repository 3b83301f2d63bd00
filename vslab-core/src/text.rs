//! Line splitting shared by the parser and the tokenizer.

/// Split text into lines on `\r\n`, `\r` or `\n`.
///
/// A trailing line break yields a trailing empty line, so joining the result with `\n`
/// reproduces the input modulo line-ending normalisation.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(&text[start..idx]);
                idx += 1;
                start = idx;
            }
            b'\r' => {
                lines.push(&text[start..idx]);
                idx += if bytes.get(idx + 1) == Some(&b'\n') { 2 } else { 1 };
                start = idx;
            }
            _ => idx += 1,
        }
    }

    lines.push(&text[start..]);
    lines
}

/// Length of `text` in UTF-16 code units, the column unit editors speak.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_line_ending() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn counts_utf16_units() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("é"), 1);
        assert_eq!(utf16_len("😀"), 2);
    }
}
