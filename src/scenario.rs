// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scenarios and their templated variants.

use std::path::PathBuf;

use linked_hash_map::LinkedHashMap;

use crate::{precondition::Precondition, step::Step, tag::Tag};

/// Variable bindings collected from `@variable` tags, in declaration
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    /// Name-to-value bindings of this [`Context`].
    pub variables: LinkedHashMap<String, String>,
}

/// Single row of an examples table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Example {
    /// Cell values of this row, in column declaration order.
    pub data: Vec<String>,

    /// [`PathBuf`] of the feature file this row was parsed from.
    pub path: PathBuf,

    /// Line number this row was parsed from.
    pub line: usize,
}

/// Payload of a scenario outline: a scenario templated over an examples
/// table.
#[derive(Clone, Debug, Default)]
pub struct OutlinePayload {
    /// Keyword of the examples table marker.
    pub examples_keyword: String,

    /// Column names of the examples table, in declaration order.
    pub header: Vec<String>,

    /// Parsed [`Example`] rows, in declaration order.
    pub examples: Vec<Example>,

    /// [`Scenario`]s materialized from the [`Example`] rows.
    ///
    /// Filled once the owning outline is finalized.
    pub scenarios: Vec<Scenario>,
}

impl OutlinePayload {
    /// Creates a new [`OutlinePayload`] with no examples yet.
    #[must_use]
    pub fn new(examples_keyword: impl Into<String>) -> Self {
        Self { examples_keyword: examples_keyword.into(), ..Self::default() }
    }

    /// Widest cell width of the given `column`, the header included.
    ///
    /// Returns [`None`] if no such column is declared.
    #[must_use]
    pub fn column_width(&self, column: usize) -> Option<usize> {
        let header = self.header.get(column)?;

        Some(
            self.examples
                .iter()
                .filter_map(|example| example.data.get(column))
                .map(String::len)
                .fold(header.len(), usize::max),
        )
    }
}

/// Payload of a scenario loop: a scenario templated over a fixed number
/// of repetitions.
#[derive(Clone, Debug)]
pub struct LoopPayload {
    /// Keyword naming the repetitions of the loop.
    pub iterations_keyword: String,

    /// Number of times the template steps are replicated.
    ///
    /// `0` is legal and materializes into zero scenarios.
    pub iterations: u64,

    /// [`Scenario`]s materialized from the template.
    ///
    /// Filled once the owning loop is finalized.
    pub scenarios: Vec<Scenario>,
}

impl LoopPayload {
    /// Creates a new [`LoopPayload`] with the given repetition count.
    #[must_use]
    pub fn new(iterations_keyword: impl Into<String>, iterations: u64) -> Self {
        Self {
            iterations_keyword: iterations_keyword.into(),
            iterations,
            scenarios: Vec::new(),
        }
    }
}

/// Variant payload of a [`Scenario`].
#[derive(Clone, Debug, Default)]
pub enum ScenarioKind {
    /// Directly runnable scenario without a template payload.
    ///
    /// Also the shape of scenarios materialized from a loop.
    #[default]
    Plain,

    /// Scenario templated over an examples table.
    Outline(OutlinePayload),

    /// Scenario templated over a fixed repetition count.
    Loop(LoopPayload),

    /// Scenario materialized from the given [`Example`] row of an
    /// outline.
    FromExample(Example),
}

/// Named, ordered sequence of [`Step`]s describing one behavior
/// example.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Identifier, unique and monotonically assigned within the owning
    /// feature, accounting for scenarios materialized from preceding
    /// outlines and loops.
    pub id: u64,

    /// Keyword this [`Scenario`]'s header was matched by.
    pub keyword: String,

    /// Sentence of this [`Scenario`].
    pub sentence: String,

    /// [`PathBuf`] of the feature file this [`Scenario`] was parsed
    /// from.
    pub path: PathBuf,

    /// Line number this [`Scenario`]'s header was parsed on.
    pub line: usize,

    /// [`Tag`]s of this [`Scenario`], in declaration order.
    pub tags: Vec<Tag>,

    /// Resolved [`Precondition`] scenarios, in declaration order.
    pub preconditions: Vec<Precondition>,

    /// [`Step`]s of this [`Scenario`], in declaration order.
    ///
    /// For an outline or loop these are the template steps, never
    /// directly executed.
    pub steps: Vec<Step>,

    /// Variable bindings of this [`Scenario`].
    pub context: Context,

    /// Variant payload of this [`Scenario`].
    pub kind: ScenarioKind,
}

impl Scenario {
    /// Creates a new [`Scenario`] without steps, tags or preconditions.
    #[must_use]
    pub fn new(
        id: u64,
        keyword: impl Into<String>,
        sentence: impl Into<String>,
        path: impl Into<PathBuf>,
        line: usize,
        kind: ScenarioKind,
    ) -> Self {
        Self {
            id,
            keyword: keyword.into(),
            sentence: sentence.into(),
            path: path.into(),
            line,
            tags: Vec::new(),
            preconditions: Vec::new(),
            steps: Vec::new(),
            context: Context::default(),
            kind,
        }
    }

    /// Indicates whether this [`Scenario`] is a template (an outline or
    /// a loop) whose own [`Step`]s are never executed directly.
    #[must_use]
    pub fn is_template(&self) -> bool {
        matches!(self.kind, ScenarioKind::Outline(_) | ScenarioKind::Loop(_))
    }

    /// [`Scenario`]s this one materializes into.
    ///
    /// Empty for non-template scenarios, and for templates not yet
    /// finalized.
    #[must_use]
    pub fn instances(&self) -> &[Scenario] {
        match &self.kind {
            ScenarioKind::Outline(outline) => &outline.scenarios,
            ScenarioKind::Loop(r#loop) => &r#loop.scenarios,
            ScenarioKind::Plain | ScenarioKind::FromExample(_) => &[],
        }
    }

    /// Number of concrete scenarios this one materializes into.
    ///
    /// Derived from the declared examples rows or the loop repetition
    /// count, so is exact even before this [`Scenario`] is finalized.
    #[must_use]
    pub fn instance_count(&self) -> u64 {
        match &self.kind {
            ScenarioKind::Outline(outline) => outline.examples.len() as u64,
            ScenarioKind::Loop(r#loop) => r#loop.iterations,
            ScenarioKind::Plain | ScenarioKind::FromExample(_) => 0,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Example, OutlinePayload};

    #[test]
    fn column_width_covers_header_and_rows() {
        let outline = OutlinePayload {
            header: vec!["a".to_owned(), "value".to_owned()],
            examples: vec![
                Example {
                    data: vec!["1234567".to_owned(), "1".to_owned()],
                    path: "demo.feature".into(),
                    line: 5,
                },
                Example {
                    data: vec!["1".to_owned(), "12".to_owned()],
                    path: "demo.feature".into(),
                    line: 6,
                },
            ],
            ..OutlinePayload::new("Examples")
        };

        assert_eq!(outline.column_width(0), Some(7));
        assert_eq!(outline.column_width(1), Some(5));
        assert_eq!(outline.column_width(2), None);
    }
}
