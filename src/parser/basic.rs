// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default feature file parser.

use std::{fs, mem, path::PathBuf};

use itertools::Itertools as _;
use tracing::debug;

use crate::{
    detect, expand,
    feature::Feature,
    keyword::{Dialects, Keywords},
    parser::{Error, Resolve, Result},
    precondition::{Precondition, Reference},
    scenario::{Example, LoopPayload, OutlinePayload, Scenario, ScenarioKind},
    step::Step,
    tag::Tag,
};

/// State of a [`Basic`] parser.
///
/// Dispatch is an exhaustive `match`, so there is no representable
/// "unsupported state".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Expecting the feature header.
    Feature,

    /// Expecting a scenario header, a tag, or feature description text.
    Scenario,

    /// Expecting a step, its payloads, or the next scenario boundary.
    Step,

    /// Expecting the header row of an examples table.
    Examples,

    /// Expecting a data row of an examples table, or the next scenario
    /// boundary.
    ExamplesRow,

    /// Inside a `"""` long text block of a step.
    StepText,
}

/// Annotations accumulated ahead of the construct they will be attached
/// to.
///
/// Reset at well-defined construct boundaries only: when a feature or a
/// scenario is created.
#[derive(Debug, Default)]
struct Pending {
    tags: Vec<Tag>,
    preconditions: Vec<Precondition>,
    variables: Vec<(String, String)>,
}

impl Pending {
    /// Takes the accumulated annotations out, leaving empty buffers.
    fn take(&mut self) -> Self {
        mem::take(self)
    }
}

/// Default [`Feature`] parser: a line-by-line state machine over a
/// single feature file.
///
/// Lines are whitespace-trimmed and classified against the active
/// [`Keywords`] table, which may be swapped mid-document by a
/// `# language: <code>` pragma. Scenario outlines and loops are
/// materialized into concrete scenario instances as soon as their
/// construct ends.
pub struct Basic<'r, D> {
    resolver: &'r dyn Resolve,
    dialects: D,
    keywords: Keywords,
    path: PathBuf,
    feature_id: u64,
    state: State,
    line: usize,
    in_step_text: bool,
    feature: Option<Feature>,
    pending: Pending,
}

impl<'r, D: Dialects> Basic<'r, D> {
    /// Creates a new [`Basic`] parser for the feature file at `path`.
    ///
    /// The `feature_id` is assigned to the parsed [`Feature`] as-is.
    /// `resolver` is consulted whenever a `@precondition` tag references
    /// another feature file.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedLanguage`] if `language` has no [`Keywords`]
    /// table in `dialects`.
    pub fn new(
        path: impl Into<PathBuf>,
        feature_id: u64,
        language: &str,
        dialects: D,
        resolver: &'r dyn Resolve,
    ) -> Result<Self> {
        let keywords = dialects.keywords(language)?;

        Ok(Self {
            resolver,
            dialects,
            keywords,
            path: path.into(),
            feature_id,
            state: State::Feature,
            line: 0,
            in_step_text: false,
            feature: None,
            pending: Pending::default(),
        })
    }

    /// Reads and parses the feature file of this parser.
    ///
    /// # Errors
    ///
    /// See [`Error`] for everything that can go wrong.
    pub fn parse(self) -> Result<Feature> {
        let input = fs::read_to_string(&self.path)?;

        self.parse_str(&input)
    }

    /// Parses the given in-memory `input`, using this parser's path for
    /// reporting only.
    ///
    /// # Errors
    ///
    /// See [`Error`] for everything that can go wrong.
    pub fn parse_str(mut self, input: &str) -> Result<Feature> {
        debug!(path = %self.path.display(), "parsing feature file");

        for line in input.lines() {
            self.line += 1;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                if let Some(code) = detect::language(line) {
                    debug!(language = code.as_str(), "switching language");
                    self.keywords = self.dialects.keywords(&code)?;
                }
                continue;
            }
            if self.feature.is_some()
                && detect::feature(line, &self.keywords).is_some()
            {
                return Err(Error::MultipleFeatures {
                    path: self.path.clone(),
                    line: self.line,
                });
            }
            if !self.dispatch(line)? {
                return Err(Error::Syntax {
                    path: self.path.clone(),
                    line: self.line,
                });
            }
        }

        let mut feature = self
            .feature
            .take()
            .ok_or_else(|| Error::NoFeature { path: self.path.clone() })?;
        if let Some(last) = feature.scenarios.last_mut() {
            expand::expand(last);
        }

        debug!(
            sentence = feature.sentence.as_str(),
            scenarios = feature.count_scenarios(),
            "parsed feature file",
        );
        Ok(feature)
    }

    /// Dispatches the `line` to the handler of the current [`State`].
    ///
    /// `Ok(false)` means no construct was recognized.
    fn dispatch(&mut self, line: &str) -> Result<bool> {
        match self.state {
            State::Feature => self.on_feature(line),
            State::Scenario => self.on_scenario(line),
            State::Step => self.on_step(line),
            State::Examples => self.on_examples(line),
            State::ExamplesRow => self.on_examples_row(line),
            State::StepText => self.on_step_text(line),
        }
    }

    /// Handles a line while expecting the feature header.
    fn on_feature(&mut self, line: &str) -> Result<bool> {
        let Some(sentence) = detect::feature(line, &self.keywords) else {
            // Tags may accumulate ahead of the feature header, but
            // preconditions only attach to scenarios.
            return self.buffer_tag(line, false);
        };

        let pending = self.pending.take();
        let mut feature = Feature::new(
            self.feature_id,
            self.keywords.feature.clone(),
            sentence,
            self.path.clone(),
            self.line,
        );
        feature.tags = pending.tags;
        feature.context.variables = pending.variables.into_iter().collect();

        self.feature = Some(feature);
        self.state = State::Scenario;
        Ok(true)
    }

    /// Handles a line while expecting a scenario header.
    fn on_scenario(&mut self, line: &str) -> Result<bool> {
        let Some((keyword, sentence, kind)) = self.scenario_header(line)
        else {
            if self.buffer_tag(line, true)? {
                return Ok(true);
            }
            self.feature_mut().description.push(line.to_owned());
            return Ok(true);
        };

        if self.feature().contains(&sentence) {
            return Err(Error::DuplicateScenario {
                sentence,
                feature: self.feature().sentence.clone(),
            });
        }

        let id = self.next_scenario_id();
        let mut scenario = Scenario::new(
            id,
            keyword,
            sentence,
            self.path.clone(),
            self.line,
            kind,
        );
        let pending = self.pending.take();
        scenario.tags = pending.tags;
        scenario.preconditions = pending.preconditions;
        scenario.context.variables = pending.variables.into_iter().collect();

        self.feature_mut().scenarios.push(scenario);
        self.state = State::Step;
        Ok(true)
    }

    /// Handles a line while expecting a step or a step payload.
    fn on_step(&mut self, line: &str) -> Result<bool> {
        if self.scenario_header(line).is_some() || detect::tag(line).is_some()
        {
            self.finalize_last();
            return self.on_scenario(line);
        }
        if detect::step_text(line) {
            self.state = State::StepText;
            self.in_step_text = false;
            return self.on_step_text(line);
        }
        if detect::table(line) {
            return self.on_table_row(line);
        }
        if detect::examples(line, &self.keywords) {
            self.state = State::Examples;
            return Ok(true);
        }

        let (path, line_number) = (self.path.clone(), self.line);
        let scenario = self.scenario_mut();
        let step = Step::new(
            scenario.steps.len() as u64 + 1,
            line,
            path,
            line_number,
            !scenario.is_template(),
        );
        scenario.steps.push(step);
        Ok(true)
    }

    /// Appends a data table row to the last step.
    fn on_table_row(&mut self, line: &str) -> Result<bool> {
        let cells = detect::table_cells(line);
        let (path, line_number) = (self.path.clone(), self.line);

        if let Some(step) = self.scenario_mut().steps.last_mut() {
            step.table.push(cells);
            Ok(true)
        } else {
            Err(Error::TableWithoutStep { path, line: line_number })
        }
    }

    /// Handles the header row of an examples table.
    fn on_examples(&mut self, line: &str) -> Result<bool> {
        let (path, line_number) = (self.path.clone(), self.line);
        let header = detect::table_cells(line);
        let duplicate = header.iter().duplicates().next().cloned();

        let scenario = self.scenario_mut();
        let ScenarioKind::Outline(outline) = &mut scenario.kind else {
            return Err(Error::UnexpectedExamples { path, line: line_number });
        };
        if let Some(column) = duplicate {
            return Err(Error::DuplicateExampleColumn {
                column,
                path,
                line: line_number,
            });
        }

        outline.header = header;
        self.state = State::ExamplesRow;
        Ok(true)
    }

    /// Handles a data row of an examples table.
    fn on_examples_row(&mut self, line: &str) -> Result<bool> {
        if self.scenario_header(line).is_some() {
            self.finalize_last();
            return self.on_scenario(line);
        }

        let example = Example {
            data: detect::table_cells(line),
            path: self.path.clone(),
            line: self.line,
        };
        // `ExamplesRow` is only ever entered for an outline.
        if let ScenarioKind::Outline(outline) = &mut self.scenario_mut().kind {
            outline.examples.push(example);
        }
        Ok(true)
    }

    /// Handles a line of a `"""` long text block.
    ///
    /// A line may simultaneously open and close a block, carrying the
    /// delimiter at both its start and end.
    fn on_step_text(&mut self, line: &str) -> Result<bool> {
        let mut text = line;

        if !self.in_step_text {
            if let Some(rest) = text.strip_prefix("\"\"\"") {
                self.in_step_text = true;
                text = rest;
            }
        }
        if self.in_step_text {
            if let Some(rest) = text.strip_suffix("\"\"\"") {
                self.in_step_text = false;
                self.state = State::Step;
                text = rest;
            }
        }

        if !text.is_empty() {
            let (path, line_number) = (self.path.clone(), self.line);
            let Some(step) = self.scenario_mut().steps.last_mut() else {
                return Err(Error::Syntax { path, line: line_number });
            };
            step.text.push(text.trim().to_owned());
        }
        Ok(true)
    }

    /// Detects a scenario-family header, in the fixed precedence of
    /// plain scenario, then outline, then loop.
    fn scenario_header(
        &self,
        line: &str,
    ) -> Option<(String, String, ScenarioKind)> {
        if let Some(sentence) = detect::scenario(line, &self.keywords) {
            return Some((
                self.keywords.scenario.clone(),
                sentence,
                ScenarioKind::Plain,
            ));
        }
        if let Some(sentence) = detect::scenario_outline(line, &self.keywords)
        {
            return Some((
                self.keywords.scenario_outline.clone(),
                sentence,
                ScenarioKind::Outline(OutlinePayload::new(
                    self.keywords.examples.clone(),
                )),
            ));
        }
        if let Some((sentence, iterations)) =
            detect::scenario_loop(line, &self.keywords)
        {
            return Some((
                self.keywords.scenario_loop.clone(),
                sentence,
                ScenarioKind::Loop(LoopPayload::new(
                    self.keywords.iterations.clone(),
                    iterations,
                )),
            ));
        }
        None
    }

    /// Buffers a tag line into the pending annotations.
    ///
    /// `@precondition` tags are resolved right away when
    /// `with_preconditions` is set, and `@variable` tags are parsed into
    /// a pending binding in any case.
    fn buffer_tag(&mut self, line: &str, with_preconditions: bool) -> Result<bool> {
        let Some((name, argument)) = detect::tag(line) else {
            return Ok(false);
        };
        let tag = Tag::new(name, argument);

        if with_preconditions && tag.is_precondition() {
            let reference =
                Reference::parse(&tag.argument, &self.path, self.line)?;
            let precondition =
                reference.resolve(&self.path, self.line, self.resolver)?;
            self.pending.preconditions.push(precondition);
        } else if tag.is_variable() {
            let (name, value) = tag.variable().ok_or_else(|| Error::Syntax {
                path: self.path.clone(),
                line: self.line,
            })?;
            self.pending.variables.push((name, value));
        }

        self.pending.tags.push(tag);
        Ok(true)
    }

    /// Materializes the instances of the last scenario, if templated.
    fn finalize_last(&mut self) {
        if let Some(scenario) = self.feature_mut().scenarios.last_mut() {
            expand::expand(scenario);
        }
    }

    /// Identifier for the next declared scenario.
    ///
    /// Identifiers stay sequential across the whole feature: a templated
    /// scenario shares its identifier with its first materialized
    /// instance and reserves one identifier per instance, so the next
    /// declared scenario starts right after the previous one's last
    /// instance.
    fn next_scenario_id(&self) -> u64 {
        self.feature()
            .scenarios
            .last()
            .map_or(1, |prev| prev.id + prev.instance_count().max(1))
    }

    /// Feature under construction.
    // PANIC: Only called from states entered after the feature header
    //        was parsed, so the feature always exists.
    #[allow(clippy::unwrap_used)]
    fn feature(&self) -> &Feature {
        self.feature.as_ref().unwrap()
    }

    /// Feature under construction.
    // PANIC: Only called from states entered after the feature header
    //        was parsed, so the feature always exists.
    #[allow(clippy::unwrap_used)]
    fn feature_mut(&mut self) -> &mut Feature {
        self.feature.as_mut().unwrap()
    }

    /// Scenario currently being filled.
    // PANIC: Only called from states entered after a scenario header
    //        was parsed, so the last scenario always exists.
    #[allow(clippy::unwrap_used)]
    fn scenario_mut(&mut self) -> &mut Scenario {
        self.feature_mut().scenarios.last_mut().unwrap()
    }
}
