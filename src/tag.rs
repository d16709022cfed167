// Copyright (c) 2018-2023  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tags annotating features and scenarios.

/// Tag name referencing a scenario of another feature file.
pub const PRECONDITION: &str = "precondition";

/// Tag name binding a variable into the annotated construct's context.
pub const VARIABLE: &str = "variable";

/// `@name` or `@name(argument)` annotation of a feature or scenario.
///
/// [`PRECONDITION`] and [`VARIABLE`] names carry parser-level behavior,
/// all other names are opaque pass-through metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    /// Name of this tag.
    pub name: String,

    /// Argument of this tag (empty, if omitted).
    pub argument: String,
}

impl Tag {
    /// Creates a new [`Tag`].
    #[must_use]
    pub fn new(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self { name: name.into(), argument: argument.into() }
    }

    /// Indicates whether this [`Tag`] references a precondition
    /// scenario.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.name == PRECONDITION
    }

    /// Indicates whether this [`Tag`] binds a variable.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.name == VARIABLE
    }

    /// Parses this [`Tag`]'s argument as a `Name: Value` variable
    /// binding.
    ///
    /// Returns [`None`] on arguments not matching that grammar.
    #[must_use]
    pub fn variable(&self) -> Option<(String, String)> {
        let (name, value) = self.argument.split_once(':')?;

        Some((name.trim().to_owned(), value.trim().to_owned()))
    }
}

#[cfg(test)]
mod spec {
    use super::Tag;

    #[test]
    fn classifies_builtin_names() {
        assert!(Tag::new("precondition", "a.feature: B").is_precondition());
        assert!(Tag::new("variable", "A: 1").is_variable());
        assert!(!Tag::new("smoke", "").is_precondition());
        assert!(!Tag::new("smoke", "").is_variable());
    }

    #[test]
    fn parses_variable_binding() {
        assert_eq!(
            Tag::new("variable", "Answer : 42 ").variable(),
            Some(("Answer".to_owned(), "42".to_owned())),
        );
        assert_eq!(Tag::new("variable", "Answer = 42").variable(), None);
    }
}
