// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Language-specific keyword tables.

use linked_hash_map::LinkedHashMap;
use once_cell::sync::Lazy;

use crate::parser::{Error, Result};

/// Delimiter between a construct keyword and its payload.
pub const KEYWORD_DELIMITER: &str = ":";

/// Literal keyword strings matched against feature file lines for one
/// language.
///
/// The parser treats these as opaque prefixes followed by the fixed
/// [`KEYWORD_DELIMITER`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Keywords {
    /// Keyword of a feature header.
    pub feature: String,

    /// Keyword of a plain scenario header.
    pub scenario: String,

    /// Keyword of a scenario outline header.
    pub scenario_outline: String,

    /// Keyword of an examples table marker.
    pub examples: String,

    /// Keyword of a scenario loop header.
    pub scenario_loop: String,

    /// Keyword naming the repetitions of a scenario loop.
    pub iterations: String,
}

impl Keywords {
    fn new(
        [feature, scenario, scenario_outline, examples, scenario_loop, iterations]: [&str; 6],
    ) -> Self {
        Self {
            feature: feature.to_owned(),
            scenario: scenario.to_owned(),
            scenario_outline: scenario_outline.to_owned(),
            examples: examples.to_owned(),
            scenario_loop: scenario_loop.to_owned(),
            iterations: iterations.to_owned(),
        }
    }
}

/// Source of per-language [`Keywords`] tables.
///
/// Implementations are free to load tables from wherever they want, as
/// long as resolution of the same language code is stable for the
/// duration of one parse.
pub trait Dialects {
    /// Resolves the [`Keywords`] table of the given language `code`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedLanguage`] if no table exists for the `code`.
    fn keywords(&self, code: &str) -> Result<Keywords>;
}

impl<D: Dialects + ?Sized> Dialects for &D {
    fn keywords(&self, code: &str) -> Result<Keywords> {
        (**self).keywords(code)
    }
}

/// Keyword tables compiled into this crate.
static LANGUAGES: Lazy<LinkedHashMap<&'static str, Keywords>> =
    Lazy::new(|| {
        [
            (
                "en",
                [
                    "Feature",
                    "Scenario",
                    "Scenario Outline",
                    "Examples",
                    "Scenario Loop",
                    "Iterations",
                ],
            ),
            (
                "de",
                [
                    "Funktionalität",
                    "Szenario",
                    "Szenariogrundriss",
                    "Beispiele",
                    "Szenarioschleife",
                    "Wiederholungen",
                ],
            ),
            (
                "fr",
                [
                    "Fonctionnalité",
                    "Scénario",
                    "Plan du scénario",
                    "Exemples",
                    "Boucle de scénario",
                    "Itérations",
                ],
            ),
        ]
        .into_iter()
        .map(|(code, keywords)| (code, Keywords::new(keywords)))
        .collect()
    });

/// [`Dialects`] implementation serving the keyword tables compiled into
/// this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builtin;

impl Dialects for Builtin {
    fn keywords(&self, code: &str) -> Result<Keywords> {
        LANGUAGES.get(code).cloned().ok_or_else(|| {
            Error::UnsupportedLanguage { language: code.to_owned() }
        })
    }
}

#[cfg(test)]
mod spec {
    use super::{Builtin, Dialects as _};

    use crate::parser::Error;

    #[test]
    fn resolves_default_language() {
        let keywords = Builtin.keywords("en").unwrap();

        assert_eq!(keywords.feature, "Feature");
        assert_eq!(keywords.scenario_loop, "Scenario Loop");
    }

    #[test]
    fn errors_on_unknown_language() {
        match Builtin.keywords("tlh") {
            Err(Error::UnsupportedLanguage { language }) => {
                assert_eq!(language, "tlh");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
