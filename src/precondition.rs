// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cross-file scenario preconditions.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use lazy_regex::regex;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::{
    feature::Feature,
    parser::{Error, Resolve, Result},
    scenario::Scenario,
};

/// [`Regex`] matching a `<path>.feature: <sentence>` precondition tag
/// argument.
static REFERENCE_REGEX: &Lazy<Regex> = regex!(r"^(.*?\.feature): (.*)$");

/// Reference to a [`Scenario`] owned by another parsed [`Feature`].
///
/// The referenced [`Feature`] stays shared: including a scenario as a
/// precondition never copies it out of its owner.
#[derive(Clone, Debug)]
pub struct Precondition {
    feature: Arc<Feature>,
    // INVARIANT: Always a valid index into `feature.scenarios`.
    scenario: usize,
}

impl Precondition {
    /// [`Feature`] owning the referenced [`Scenario`].
    #[must_use]
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// The referenced [`Scenario`].
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.feature.scenarios[self.scenario]
    }
}

/// Parsed `@precondition` tag argument, not yet resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reference {
    /// Referenced feature file, relative to the referencing document's
    /// directory.
    pub path: PathBuf,

    /// Sentence of the referenced scenario.
    pub sentence: String,
}

impl Reference {
    /// Parses a `@precondition` tag `argument` of the form
    /// `<path>.feature: <sentence>`.
    ///
    /// # Errors
    ///
    /// [`Error::PreconditionArgument`] on any other argument shape,
    /// reported at the given `path` and `line` of the referencing tag.
    pub fn parse(argument: &str, path: &Path, line: usize) -> Result<Self> {
        let caps = REFERENCE_REGEX.captures(argument).ok_or_else(|| {
            Error::PreconditionArgument { path: path.to_owned(), line }
        })?;

        Ok(Self {
            path: caps[1].into(),
            sentence: caps[2].trim().to_owned(),
        })
    }

    /// Resolves this [`Reference`] through the given `resolver` into a
    /// [`Precondition`].
    ///
    /// The referenced path is joined onto the directory of the `origin`
    /// document.
    ///
    /// # Errors
    ///
    /// - [`Error::CyclicPrecondition`] if resolution leads back into a
    ///   file still being parsed.
    /// - [`Error::NoSuchPrecondition`] if the parsed target has no
    ///   scenario with the referenced sentence.
    /// - Any parse [`Error`] of the referenced file.
    pub fn resolve(
        &self,
        origin: &Path,
        line: usize,
        resolver: &dyn Resolve,
    ) -> Result<Precondition> {
        let target = origin
            .parent()
            .map_or_else(|| self.path.clone(), |dir| dir.join(&self.path));

        let feature =
            resolver.resolve_feature(&target).map_err(|e| match e {
                Error::Recursion { .. } => Error::CyclicPrecondition {
                    origin: origin.to_owned(),
                    target: self.path.clone(),
                    sentence: self.sentence.clone(),
                    line,
                },
                other => other,
            })?;

        let scenario = feature
            .scenarios
            .iter()
            .position(|s| s.sentence == self.sentence)
            .ok_or_else(|| Error::NoSuchPrecondition {
                sentence: self.sentence.clone(),
                path: target.clone(),
            })?;

        trace!(
            target = %target.display(),
            sentence = self.sentence.as_str(),
            "resolved precondition scenario",
        );
        Ok(Precondition { feature, scenario })
    }
}

#[cfg(test)]
mod spec {
    use std::path::Path;

    use crate::parser::Error;

    use super::Reference;

    #[test]
    fn parses_reference_argument() {
        let reference =
            Reference::parse("base.feature: Set up", Path::new("demo.feature"), 4)
                .unwrap();

        assert_eq!(reference.path, Path::new("base.feature"));
        assert_eq!(reference.sentence, "Set up");
    }

    #[test]
    fn rejects_malformed_argument() {
        match Reference::parse("base.story: Set up", Path::new("demo.feature"), 4)
        {
            Err(Error::PreconditionArgument { line: 4, .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
