//! Property-based tests for canonical formatting
//!
//! Any document that parses must reach a fixed point after one format pass,
//! and formatting must never change which keys and options are declared.

use optionlines::OptionLines;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Keys with unique, prefixed options so no option is shared between keys
fn declarations_strategy() -> impl Strategy<Value = BTreeMap<String, BTreeSet<String>>> {
    prop::collection::btree_map(
        "[a-z][a-z_]{0,11}",
        prop::collection::btree_set("[a-z0-9][a-z0-9-]{0,14}", 0..9),
        1..6,
    )
    .prop_map(|keys| {
        keys.into_iter()
            .map(|(key, options)| {
                let options = options
                    .into_iter()
                    .map(|option| format!("{}.{}", key, option))
                    .collect();
                (key, options)
            })
            .collect()
    })
}

fn task_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("*"), Just("**")],
        prop_oneof![Just(" "), Just("/"), Just("x"), Just("-"), Just(">")],
        "[A-Za-z][A-Za-z ]{0,30}[a-z]",
        0usize..6,
    )
        .prop_map(|(emphasis, status, description, indent)| {
            format!("{}{}[{}] {}", " ".repeat(indent), emphasis, status, description)
        })
}

/// Render declarations loosely: odd spacing, upper case, options split over
/// continuation lines, with comments and tasks in between.
fn document_strategy() -> impl Strategy<Value = (String, BTreeMap<String, BTreeSet<String>>)> {
    (
        declarations_strategy(),
        prop::collection::vec(task_strategy(), 0..4),
        1usize..4,
    )
        .prop_map(|(declarations, tasks, per_line)| {
            let mut lines = vec!["# generated document".to_string()];
            for (key, options) in &declarations {
                let options: Vec<_> = options.iter().cloned().collect();
                let mut chunks = options.chunks(per_line);
                let first = chunks.next().map(|c| c.join("|")).unwrap_or_default();
                lines.push(format!("{}::  {}", key.to_uppercase(), first));
                for chunk in chunks {
                    lines.push(format!("      | {} ||", chunk.join(" | ")));
                }
            }
            lines.push(String::new());
            lines.extend(tasks);
            (lines.join("\n"), declarations)
        })
}

fn declared(doc: &OptionLines) -> BTreeMap<String, BTreeSet<String>> {
    doc.declarations()
        .map(|decl| (decl.key.clone(), decl.options.clone()))
        .collect()
}

proptest! {
    #[test]
    fn format_reaches_fixed_point(
        (text, _) in document_strategy(),
        width in 10usize..100,
    ) {
        let first = OptionLines::parse_with_max_line_length(&text, width)
            .expect("generated document parses");
        let formatted = first.to_string();
        let second = OptionLines::parse_with_max_line_length(&formatted, width)
            .expect("canonical text parses");
        prop_assert_eq!(second.to_string(), formatted);
        prop_assert_eq!(declared(&second), declared(&first));
        prop_assert_eq!(second.tasks().count(), first.tasks().count());
    }

    #[test]
    fn parse_keeps_every_option((text, declarations) in document_strategy()) {
        let doc = OptionLines::parse(&text).expect("generated document parses");
        prop_assert_eq!(declared(&doc), declarations.clone());
        let total: usize = declarations.values().map(BTreeSet::len).sum();
        prop_assert_eq!(doc.option_count(), total);
        for (key, options) in &declarations {
            for option in options {
                prop_assert_eq!(
                    doc.owner_of(option).map(|decl| decl.key.as_str()),
                    Some(key.as_str())
                );
            }
        }
    }

    #[test]
    fn wrapped_lines_fit_unless_one_option_is_too_wide(
        (text, _) in document_strategy(),
        width in 20usize..80,
    ) {
        let doc = OptionLines::parse(&text).expect("generated document parses");
        let option_width = width.saturating_sub(doc.max_key_width() + 4);
        for line in doc.formatted_lines(Some(width)) {
            if line.trim_start().starts_with('#') || line.contains('[') {
                continue;
            }
            let options_part = line
                .split_once(" :: ")
                .map(|(_, rest)| rest.to_string())
                .unwrap_or_else(|| line.trim_start().to_string());
            let widest = options_part
                .trim_start_matches("| ")
                .split(" | ")
                .map(|option| option.chars().count())
                .max()
                .unwrap_or(0);
            if option_width > 0 && widest + 2 <= option_width {
                prop_assert!(options_part.chars().count() <= option_width, "{:?}", line);
            }
        }
    }
}
