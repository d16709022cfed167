// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for parsing feature files.

pub mod basic;

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use derive_more::{Display, Error};

use crate::feature::Feature;

#[doc(inline)]
pub use self::basic::Basic;

/// Result of parsing a feature file.
pub type Result<T> = std::result::Result<T, Error>;

/// Source of parsed [`Feature`]s referenced as preconditions.
///
/// Implementations recursively apply the same grammar to the referenced
/// file, and must report a resolution chain leading back into a file
/// still being parsed as [`Error::Recursion`], distinctly from ordinary
/// parse failures, so callers can classify it as a precondition cycle.
pub trait Resolve {
    /// Returns the parsed [`Feature`] at the given `path`.
    ///
    /// # Errors
    ///
    /// Any [`Error`] of parsing the referenced file, or
    /// [`Error::Recursion`] on a cyclic resolution chain.
    fn resolve_feature(&self, path: &Path) -> Result<Arc<Feature>>;
}

/// Error of parsing a feature file.
///
/// The first detected error aborts the whole parse: there is no
/// partial-result recovery or multi-error collection.
#[derive(Clone, Debug, Display, Error)]
pub enum Error {
    /// No keyword table exists for the requested language.
    #[display(fmt = "language '{}' is not supported", language)]
    UnsupportedLanguage {
        /// Requested language code.
        language: String,
    },

    /// No construct was recognized for a line in the current parser
    /// state.
    #[display(
        fmt = "syntax error in feature file {} on line {}",
        "path.display()",
        line
    )]
    Syntax {
        /// Feature file the offending line is in.
        path: PathBuf,

        /// Offending line number.
        line: usize,
    },

    /// A second feature header was found in the same document.
    #[display(
        fmt = "only one feature is allowed per feature file: {} on line {}",
        "path.display()",
        line
    )]
    MultipleFeatures {
        /// Feature file the second header is in.
        path: PathBuf,

        /// Line number of the second header.
        line: usize,
    },

    /// Two scenarios of one feature share the same sentence.
    #[display(
        fmt = "scenario named '{}' is defined twice in feature '{}'",
        sentence,
        feature
    )]
    DuplicateScenario {
        /// Duplicated scenario sentence.
        sentence: String,

        /// Sentence of the feature declaring it twice.
        feature: String,
    },

    /// An examples table was attached to a non-outline scenario.
    #[display(
        fmt = "scenario does not support examples: {} on line {}",
        "path.display()",
        line
    )]
    UnexpectedExamples {
        /// Feature file the examples marker is in.
        path: PathBuf,

        /// Line number of the examples marker.
        line: usize,
    },

    /// A data table row was found with no preceding step.
    #[display(
        fmt = "found data table without previous step: {} on line {}",
        "path.display()",
        line
    )]
    TableWithoutStep {
        /// Feature file the row is in.
        path: PathBuf,

        /// Line number of the row.
        line: usize,
    },

    /// An examples table declares the same column name twice.
    #[display(
        fmt = "examples column '{}' is declared twice: {} on line {}",
        column,
        "path.display()",
        line
    )]
    DuplicateExampleColumn {
        /// Duplicated column name.
        column: String,

        /// Feature file the header is in.
        path: PathBuf,

        /// Line number of the header.
        line: usize,
    },

    /// A `@precondition` tag argument doesn't match the
    /// `file.feature: Scenario sentence` grammar.
    #[display(
        fmt = "precondition tag argument must be like \
               'some.feature: Some scenario': {} on line {}",
        "path.display()",
        line
    )]
    PreconditionArgument {
        /// Feature file the tag is in.
        path: PathBuf,

        /// Line number of the tag.
        line: usize,
    },

    /// Precondition references form a cycle.
    #[display(
        fmt = "feature '{}' has cyclic preconditions with '{}: {}' \
               starting on line {}",
        "origin.display()",
        "target.display()",
        sentence,
        line
    )]
    CyclicPrecondition {
        /// Feature file the cycle was detected in.
        origin: PathBuf,

        /// Referenced feature file closing the cycle.
        target: PathBuf,

        /// Referenced scenario sentence.
        sentence: String,

        /// Line number of the referencing tag.
        line: usize,
    },

    /// A referenced precondition scenario doesn't exist in the parsed
    /// target feature.
    #[display(
        fmt = "cannot import precondition scenario '{}' from feature \
               '{}': no such scenario",
        sentence,
        "path.display()"
    )]
    NoSuchPrecondition {
        /// Referenced scenario sentence.
        sentence: String,

        /// Parsed target feature file.
        path: PathBuf,
    },

    /// A [`Resolve`] implementation was asked for a file it is already
    /// parsing.
    ///
    /// Rewrapped as [`Error::CyclicPrecondition`] at the referencing
    /// tag.
    #[display(
        fmt = "feature file {} is already being parsed",
        "path.display()"
    )]
    Recursion {
        /// Feature file closing the resolution chain.
        path: PathBuf,
    },

    /// No feature header was found by the end of input.
    #[display(fmt = "no feature found in file {}", "path.display()")]
    NoFeature {
        /// Parsed feature file.
        path: PathBuf,
    },

    /// Failed to read a feature file.
    #[display(fmt = "failed to read feature file: {}", _0)]
    Io(Arc<io::Error>),

    /// Failed to discover feature files under a directory.
    #[display(fmt = "failed to discover feature files: {}", _0)]
    Discovery(Arc<globwalk::GlobError>),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<globwalk::GlobError> for Error {
    fn from(err: globwalk::GlobError) -> Self {
        Self::Discovery(Arc::new(err))
    }
}
