// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Caching cross-file feature resolution.

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use itertools::Itertools as _;
use tracing::{debug, trace};

use crate::{
    feature::Feature,
    keyword::{Builtin, Dialects},
    parser::{Basic, Error, Resolve, Result},
};

/// Caching [`Resolve`] implementation and main entry point for parsing
/// feature files.
///
/// Every file is parsed at most once: repeated references to the same
/// file (multiple `@precondition` tags, overlapping directory scans)
/// share one [`Arc`]ed [`Feature`]. Feature identifiers are assigned in
/// parse order, starting at `1`.
///
/// Cyclic precondition chains are detected deterministically: a file
/// referenced again while it is still being parsed resolves to
/// [`Error::Recursion`] instead of overflowing the call stack.
#[derive(Debug)]
pub struct Cached<D = Builtin> {
    /// Source of per-language keyword tables.
    dialects: D,

    /// Language the parsed documents start in, unless switched by a
    /// pragma.
    language: String,

    /// Parsing state shared by sibling parser instances.
    state: RefCell<State>,
}

impl<D: Default> Default for Cached<D> {
    fn default() -> Self {
        Self {
            dialects: D::default(),
            language: "en".to_owned(),
            state: RefCell::new(State::default()),
        }
    }
}

/// Interior state of a [`Cached`] resolver.
#[derive(Debug, Default)]
struct State {
    /// Features parsed so far, keyed by canonicalized path.
    cache: HashMap<PathBuf, Arc<Feature>>,

    /// Chain of files currently being parsed, outermost first.
    parsing: Vec<PathBuf>,

    /// Identifier handed to the most recently started parse.
    last_id: u64,
}

impl Cached<Builtin> {
    /// Creates a new [`Cached`] resolver over the built-in keyword
    /// tables, starting in English.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Dialects> Cached<D> {
    /// Creates a new [`Cached`] resolver over the given `dialects`,
    /// starting in the given `language`.
    #[must_use]
    pub fn with_dialects(dialects: D, language: impl Into<String>) -> Self {
        Self {
            dialects,
            language: language.into(),
            state: RefCell::new(State::default()),
        }
    }

    /// Parses the feature file at `path`, or returns the cached result
    /// of a previous parse.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if `path` cannot be read.
    /// - [`Error::Recursion`] if `path` is still being parsed further up
    ///   the call chain.
    /// - Any parse [`Error`] of the file itself.
    pub fn parse_feature(&self, path: &Path) -> Result<Arc<Feature>> {
        let path = path.canonicalize().map_err(Error::from)?;

        if let Some(feature) = self.state.borrow().cache.get(&path) {
            trace!(path = %path.display(), "feature cache hit");
            return Ok(Arc::clone(feature));
        }
        if self.state.borrow().parsing.iter().any(|p| *p == path) {
            return Err(Error::Recursion { path });
        }

        let id = {
            let mut state = self.state.borrow_mut();
            state.parsing.push(path.clone());
            state.last_id += 1;
            state.last_id
        };
        // The borrow is released around the parse itself, as resolving
        // preconditions re-enters this method.
        let parsed =
            Basic::new(&path, id, &self.language, &self.dialects, self)
                .and_then(Basic::parse);

        let mut state = self.state.borrow_mut();
        state.parsing.pop();
        let feature = parsed.map(Arc::new)?;
        state.cache.insert(path, Arc::clone(&feature));

        Ok(feature)
    }

    /// Parses all feature files under `path`.
    ///
    /// A directory is scanned for `*.feature` files (case-insensitively)
    /// and parsed in path order; a file path parses that single file.
    ///
    /// # Errors
    ///
    /// - [`Error::Discovery`] if the directory cannot be scanned.
    /// - The first parse [`Error`] of any discovered file.
    pub fn parse_path(&self, path: &Path) -> Result<Vec<Arc<Feature>>> {
        if path.is_file() {
            return self.parse_feature(path).map(|feature| vec![feature]);
        }

        debug!(path = %path.display(), "discovering feature files");
        let entries = globwalk::GlobWalkerBuilder::new(path, "*.feature")
            .case_insensitive(true)
            .build()
            .map_err(Error::from)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path().to_owned())
            .sorted();

        entries.map(|entry| self.parse_feature(&entry)).collect()
    }
}

impl<D: Dialects> Resolve for Cached<D> {
    fn resolve_feature(&self, path: &Path) -> Result<Arc<Feature>> {
        self.parse_feature(path)
    }
}
