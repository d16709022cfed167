// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stateless detectors classifying a single feature file line.
//!
//! Every detector takes an already-trimmed, non-empty line, plus the
//! active [`Keywords`] table where keyword matching is involved.

use lazy_regex::regex;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::keyword::{Keywords, KEYWORD_DELIMITER};

/// [`Regex`] matching a `@name` or `@name(argument)` tag.
static TAG_REGEX: &Lazy<Regex> = regex!(r"^@([^\s(]+)(?:\((.*?)\))?");

/// [`Regex`] matching a `# language: <code>` pragma comment.
static LANGUAGE_REGEX: &Lazy<Regex> = regex!(r"^# language: (.*)");

/// Payload of the `line` if it starts with the `keyword` followed by
/// the [`KEYWORD_DELIMITER`].
fn keyword_payload<'l>(line: &'l str, keyword: &str) -> Option<&'l str> {
    line.strip_prefix(keyword)?
        .strip_prefix(KEYWORD_DELIMITER)
        .map(str::trim)
}

/// Detects a feature header, returning its sentence.
pub fn feature(line: &str, keywords: &Keywords) -> Option<String> {
    keyword_payload(line, &keywords.feature).map(ToOwned::to_owned)
}

/// Detects a plain scenario header, returning its sentence.
pub fn scenario(line: &str, keywords: &Keywords) -> Option<String> {
    keyword_payload(line, &keywords.scenario).map(ToOwned::to_owned)
}

/// Detects a scenario outline header, returning its sentence.
pub fn scenario_outline(line: &str, keywords: &Keywords) -> Option<String> {
    keyword_payload(line, &keywords.scenario_outline).map(ToOwned::to_owned)
}

/// Detects a `<keyword> <N>: <sentence>` scenario loop header,
/// returning the sentence and the iteration count.
///
/// A count of `0` is legal and materializes into zero scenarios.
pub fn scenario_loop(line: &str, keywords: &Keywords) -> Option<(String, u64)> {
    let rest = line
        .strip_prefix(keywords.scenario_loop.as_str())?
        .strip_prefix(' ')?;
    let (count, sentence) = rest.split_once(KEYWORD_DELIMITER)?;
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let iterations = count.parse().ok()?;

    Some((sentence.trim().to_owned(), iterations))
}

/// Detects an examples table marker.
pub fn examples(line: &str, keywords: &Keywords) -> bool {
    keyword_payload(line, &keywords.examples).is_some()
}

/// Detects a `@name` or `@name(argument)` tag, returning its name and
/// argument (empty, if omitted).
pub fn tag(line: &str) -> Option<(String, String)> {
    TAG_REGEX.captures(line).map(|caps| {
        (
            caps[1].to_owned(),
            caps.get(2).map_or(String::new(), |arg| arg.as_str().to_owned()),
        )
    })
}

/// Detects a pipe-delimited table row.
pub fn table(line: &str) -> bool {
    line.starts_with('|')
}

/// Splits a pipe-delimited table row into its trimmed cells, dropping
/// the empty split artifacts of the boundary pipes.
pub fn table_cells(line: &str) -> Vec<String> {
    let cells = line.split('|').collect::<Vec<_>>();

    cells
        .get(1..cells.len().saturating_sub(1))
        .unwrap_or(&[])
        .iter()
        .map(|cell| cell.trim().to_owned())
        .collect()
}

/// Detects the delimiter of a long step text block.
pub fn step_text(line: &str) -> bool {
    line.starts_with("\"\"\"")
}

/// Detects a `# language: <code>` pragma, returning the language code.
pub fn language(line: &str) -> Option<String> {
    LANGUAGE_REGEX
        .captures(line)
        .map(|caps| caps[1].trim().to_owned())
}

#[cfg(test)]
mod spec {
    use crate::keyword::{Builtin, Dialects as _, Keywords};

    use super::{
        examples, feature, language, scenario, scenario_loop,
        scenario_outline, step_text, table, table_cells, tag,
    };

    fn keywords() -> Keywords {
        Builtin.keywords("en").unwrap()
    }

    #[test]
    fn detects_headers() {
        let kw = keywords();

        assert_eq!(feature("Feature: Demo", &kw).as_deref(), Some("Demo"));
        assert_eq!(scenario("Scenario: Add", &kw).as_deref(), Some("Add"));
        assert_eq!(
            scenario_outline("Scenario Outline: Add", &kw).as_deref(),
            Some("Add"),
        );
        assert!(examples("Examples:", &kw));
        assert_eq!(feature("Functionality: Demo", &kw), None);
    }

    #[test]
    fn scenario_keyword_does_not_shadow_outline() {
        let kw = keywords();

        assert_eq!(scenario("Scenario Outline: Add", &kw), None);
    }

    #[test]
    fn detects_loop_header_with_count() {
        let kw = keywords();

        assert_eq!(
            scenario_loop("Scenario Loop 10: Repeat me", &kw),
            Some(("Repeat me".to_owned(), 10)),
        );
        assert_eq!(
            scenario_loop("Scenario Loop 0: Nothing", &kw),
            Some(("Nothing".to_owned(), 0)),
        );
        assert_eq!(scenario_loop("Scenario Loop: Repeat me", &kw), None);
        assert_eq!(scenario_loop("Scenario Loop ten: Repeat me", &kw), None);
    }

    #[test]
    fn detects_tags() {
        assert_eq!(tag("@smoke"), Some(("smoke".to_owned(), String::new())));
        assert_eq!(
            tag("@variable(Answer: 42)"),
            Some(("variable".to_owned(), "Answer: 42".to_owned())),
        );
        assert_eq!(tag("smoke"), None);
    }

    #[test]
    fn splits_table_cells() {
        assert!(table("| 1 | 2 |"));
        assert_eq!(table_cells("| 1 | 2 |"), vec!["1", "2"]);
        assert_eq!(table_cells("|  a  ||"), vec!["a", ""]);
        assert_eq!(table_cells("no pipes"), Vec::<String>::new());
    }

    #[test]
    fn detects_language_pragma() {
        assert_eq!(language("# language: de").as_deref(), Some("de"));
        assert_eq!(language("# a plain comment"), None);
        assert!(step_text(r#""""start of text"#));
    }
}
