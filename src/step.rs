// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single step of a scenario.

use std::path::PathBuf;

/// One action or assertion line of a [`Scenario`].
///
/// [`Scenario`]: crate::scenario::Scenario
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    /// 1-based identifier, unique within the owning [`Scenario`]
    /// instance.
    ///
    /// [`Scenario`]: crate::scenario::Scenario
    pub id: u64,

    /// Sentence of this [`Step`].
    pub sentence: String,

    /// [`PathBuf`] of the feature file this [`Step`] was parsed from.
    pub path: PathBuf,

    /// Line number this [`Step`] was parsed from.
    pub line: usize,

    /// Indicates whether this [`Step`] may be executed directly.
    ///
    /// `false` for template steps of a scenario outline or loop, which
    /// only materialized copies of are runnable.
    pub runnable: bool,

    /// Optional data table of this [`Step`], one [`Vec`] of cells per
    /// row.
    pub table: Vec<Vec<String>>,

    /// Optional long text block of this [`Step`], one element per line.
    pub text: Vec<String>,
}

impl Step {
    /// Creates a new [`Step`] without a data table or long text block.
    #[must_use]
    pub fn new(
        id: u64,
        sentence: impl Into<String>,
        path: impl Into<PathBuf>,
        line: usize,
        runnable: bool,
    ) -> Self {
        Self {
            id,
            sentence: sentence.into(),
            path: path.into(),
            line,
            runnable,
            table: Vec::new(),
            text: Vec::new(),
        }
    }
}
