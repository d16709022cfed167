// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level feature of a parsed document.

use std::{iter, path::PathBuf};

use either::Either;

use crate::{
    scenario::{Context, Scenario, ScenarioKind},
    tag::Tag,
};

/// Top-level named specification of a feature file.
///
/// Exactly one exists per parsed document.
#[derive(Clone, Debug)]
pub struct Feature {
    /// Caller-assigned identifier of this [`Feature`].
    pub id: u64,

    /// Keyword this [`Feature`]'s header was matched by.
    pub keyword: String,

    /// Sentence of this [`Feature`].
    pub sentence: String,

    /// [`PathBuf`] of the feature file this [`Feature`] was parsed
    /// from.
    pub path: PathBuf,

    /// Line number this [`Feature`]'s header was parsed on.
    pub line: usize,

    /// [`Tag`]s of this [`Feature`], in declaration order.
    pub tags: Vec<Tag>,

    /// Free-text description lines following the header.
    pub description: Vec<String>,

    /// Declared [`Scenario`]s, in declaration order.
    pub scenarios: Vec<Scenario>,

    /// Variable bindings of this [`Feature`].
    pub context: Context,
}

impl Feature {
    /// Creates a new [`Feature`] without scenarios or description.
    #[must_use]
    pub fn new(
        id: u64,
        keyword: impl Into<String>,
        sentence: impl Into<String>,
        path: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        Self {
            id,
            keyword: keyword.into(),
            sentence: sentence.into(),
            path: path.into(),
            line,
            tags: Vec::new(),
            description: Vec::new(),
            scenarios: Vec::new(),
            context: Context::default(),
        }
    }

    /// Looks up a declared [`Scenario`] by its `sentence`.
    #[must_use]
    pub fn scenario(&self, sentence: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.sentence == sentence)
    }

    /// Indicates whether a [`Scenario`] with the given `sentence` is
    /// declared in this [`Feature`].
    #[must_use]
    pub fn contains(&self, sentence: &str) -> bool {
        self.scenario(sentence).is_some()
    }

    /// Iterates all concrete [`Scenario`]s of this [`Feature`],
    /// replacing templated ones by their materialized instances.
    pub fn concrete_scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().flat_map(|s| match &s.kind {
            ScenarioKind::Outline(outline) => {
                Either::Left(outline.scenarios.iter())
            }
            ScenarioKind::Loop(r#loop) => Either::Left(r#loop.scenarios.iter()),
            ScenarioKind::Plain | ScenarioKind::FromExample(_) => {
                Either::Right(iter::once(s))
            }
        })
    }

    /// Counts all concrete [`Scenario`]s of this [`Feature`].
    #[must_use]
    pub fn count_scenarios(&self) -> usize {
        self.concrete_scenarios().count()
    }

    /// Counts all [`Step`]s of this [`Feature`]'s concrete
    /// [`Scenario`]s.
    ///
    /// [`Step`]: crate::step::Step
    #[must_use]
    pub fn count_steps(&self) -> usize {
        self.concrete_scenarios().map(|s| s.steps.len()).sum()
    }
}
