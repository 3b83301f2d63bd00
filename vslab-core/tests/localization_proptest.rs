//! Property-based tests for the parse/format cycle
//!
//! These tests ensure that canonical formatting only changes layout:
//! - formatting is idempotent across a parse/format cycle
//! - the key set and every value survive formatting
//! - formatted keys are strictly increasing

use proptest::prelude::*;
use vslab_core::localization::{format_table, format_text, parse, parse_lines, Table};

/// Generate keys that survive trimming and cannot be mistaken for the cut marker
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z_][A-Za-z0-9_]{0,12}",
        "[a-z][a-z0-9.]{0,8}",
        "[A-Z][A-Za-z]{0,6}",
    ]
}

/// Values are raw text up to the end of the line and may contain separators or markers
fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[^\r\n]{0,24}",
        "[a-z ]{0,6}\\{[0-9]\\}[a-z]{0,4}",
        "[a-z]{0,4}=[a-z]{0,4}",
        " {0,3}!!![a-z]{0,4}",
    ]
}

fn source_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec((key_strategy(), value_strategy(), 0usize..3), 0..12),
        prop::collection::vec("[^\r\n]{0,16}", 0..4),
    )
        .prop_map(|(pairs, tail)| {
            let mut lines = Vec::new();
            for (key, value, padding) in pairs {
                lines.push(format!("{}{key}{}={value}", " ".repeat(padding), " ".repeat(padding)));
                if padding == 2 {
                    lines.push(String::new());
                }
            }
            lines.push("!!! trailer".to_string());
            lines.extend(tail);
            lines.join("\n")
        })
}

fn entries(table: &Table) -> Vec<(String, String)> {
    table
        .sorted_entries()
        .into_iter()
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect()
}

proptest! {
    #[test]
    fn formatting_is_idempotent(source in source_strategy()) {
        let table = parse(&source).expect("generated source parses");
        let once = format_text(&table);
        let twice = format_text(&parse(&once).expect("formatted source parses"));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn formatting_preserves_data(source in source_strategy()) {
        let table = parse(&source).expect("generated source parses");
        let reparsed = parse_lines(&format_table(&table)).expect("formatted source parses");
        prop_assert_eq!(entries(&table), entries(&reparsed));
        prop_assert_eq!(table.tail_lines(), reparsed.tail_lines());
    }

    #[test]
    fn formatted_keys_are_strictly_increasing(source in source_strategy()) {
        let table = parse(&source).expect("generated source parses");
        let lines = format_table(&table);
        let keys: Vec<&str> = lines[..table.len()]
            .iter()
            .map(|line| line.split_once('=').map(|(key, _)| key.trim()).unwrap_or(""))
            .collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }
}
