// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Gherkin-dialect feature file parser with scenario outlines, scenario
//! loops and cross-file scenario preconditions.
//!
//! A feature file is a line-oriented behavioral specification:
//!
//! ```gherkin
//! Feature: Hungry
//!   Scenario Outline: eating
//!     Given there are <start> cucumbers
//!     When I eat <eat> cucumbers
//!
//!     Examples:
//!       | start | eat |
//!       |    12 |   5 |
//!       |    20 |   4 |
//! ```
//!
//! Parsing yields exactly one [`Feature`] holding its declared
//! [`Scenario`]s. Templated scenarios — outlines parameterized by an
//! `Examples` table, and loops (`Scenario Loop <N>:`) repeated a fixed
//! number of times — are materialized into concrete, uniquely numbered
//! scenario instances as soon as their construct ends.
//!
//! Scenarios may pull in scenarios of other feature files via
//! `@precondition(other.feature: Some scenario)` tags. Resolution is
//! recursive, cached, and rejects cyclic inclusion chains with a
//! dedicated error instead of exhausting the call stack.
//!
//! The usual entry point is the [`Cached`] resolver:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use caraway::Cached;
//!
//! # fn main() -> caraway::Result<()> {
//! let resolver = Cached::new();
//! let feature = resolver.parse_feature(Path::new("demo.feature"))?;
//!
//! assert_eq!(feature.sentence, "Hungry");
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod expand;
pub mod feature;
pub mod keyword;
pub mod parser;
pub mod precondition;
pub mod resolver;
pub mod scenario;
pub mod step;
pub mod tag;

pub use self::{
    feature::Feature,
    keyword::{Builtin, Dialects, Keywords},
    parser::{Basic, Error, Resolve, Result},
    precondition::{Precondition, Reference},
    resolver::Cached,
    scenario::{
        Context, Example, LoopPayload, OutlinePayload, Scenario, ScenarioKind,
    },
    step::Step,
    tag::Tag,
};
