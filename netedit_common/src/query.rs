//! Structured object queries.
//!
//! [`QueryOptions`] carries the recognized query switches. The backing
//! database evaluates them natively; the core resolver layers the
//! cell-containment relation on top.

use serde::{Deserialize, Serialize};

use crate::{name, CommonError, MatchStyle, NamePattern, ObjectRef, PatternOptions};

/// Recognized query switches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Search every level of hierarchy, matching leaf names as well as full names.
    pub hierarchical: bool,
    /// Patterns are regular expressions rather than globs.
    pub regexp: bool,
    /// Case-insensitive matching.
    pub nocase: bool,
    /// Suppress not-found errors.
    pub quiet: bool,
    /// Log every match.
    pub verbose: bool,
    /// Boolean property predicate.
    pub filter: Option<String>,
    /// Hierarchy separator override.
    pub hsc: Option<char>,
    /// Glob wildcard behaviour.
    pub match_style: MatchStyle,
    /// Restrict to objects related to these objects.
    pub of_objects: Vec<ObjectRef>,
    /// Name patterns; empty means every name.
    pub patterns: Vec<String>,
}

impl QueryOptions {
    /// Query matching every object at the top level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query for the given patterns.
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Appends a pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Sets hierarchical search.
    #[must_use]
    pub fn hierarchical(mut self, on: bool) -> Self {
        self.hierarchical = on;
        self
    }

    /// Sets regular-expression mode.
    #[must_use]
    pub fn regexp(mut self, on: bool) -> Self {
        self.regexp = on;
        self
    }

    /// Sets case-insensitive matching.
    #[must_use]
    pub fn nocase(mut self, on: bool) -> Self {
        self.nocase = on;
        self
    }

    /// Sets quiet mode.
    #[must_use]
    pub fn quiet(mut self, on: bool) -> Self {
        self.quiet = on;
        self
    }

    /// Sets verbose mode.
    #[must_use]
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    /// Sets the property filter.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Overrides the hierarchy separator.
    #[must_use]
    pub fn hsc(mut self, separator: char) -> Self {
        self.hsc = Some(separator);
        self
    }

    /// Sets the glob wildcard behaviour.
    #[must_use]
    pub fn match_style(mut self, style: MatchStyle) -> Self {
        self.match_style = style;
        self
    }

    /// Adds a related object.
    #[must_use]
    pub fn of_object(mut self, object: ObjectRef) -> Self {
        self.of_objects.push(object);
        self
    }

    /// The separator in effect, given the session default.
    #[must_use]
    pub fn separator(&self, default: char) -> char {
        self.hsc.unwrap_or(default)
    }

    /// Patterns in effect: the given ones, or `*`.
    #[must_use]
    pub fn effective_patterns(&self) -> Vec<&str> {
        if self.patterns.is_empty() {
            vec!["*"]
        } else {
            self.patterns.iter().map(String::as_str).collect()
        }
    }

    /// Pattern compilation options in effect.
    #[must_use]
    pub fn pattern_options(&self, default_separator: char) -> PatternOptions {
        PatternOptions {
            regexp: self.regexp,
            nocase: self.nocase,
            match_style: self.match_style,
            separator: self.separator(default_separator),
        }
    }

    /// Compiles the patterns in effect into a [`NameMatcher`].
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::InvalidPattern`] for a pattern that does not compile.
    pub fn matcher(&self, default_separator: char) -> Result<NameMatcher, CommonError> {
        let options = self.pattern_options(default_separator);
        let patterns = self
            .effective_patterns()
            .into_iter()
            .map(|p| NamePattern::compile(p, &options))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NameMatcher {
            patterns,
            hierarchical: self.hierarchical,
            separator: options.separator,
        })
    }
}

/// Compiled name patterns plus the hierarchy rule they are applied under.
#[derive(Clone, Debug)]
pub struct NameMatcher {
    patterns: Vec<NamePattern>,
    hierarchical: bool,
    separator: char,
}

impl NameMatcher {
    /// Returns true if any pattern accepts `full_name`.
    ///
    /// Hierarchical matchers also try the leaf name.
    #[must_use]
    pub fn matches(&self, full_name: &str) -> bool {
        let leaf = name::leaf(full_name, self.separator);
        self.patterns.iter().any(|p| {
            p.matches(full_name) || (self.hierarchical && leaf != full_name && p.matches(leaf))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patterns_mean_everything_at_top() {
        let m = QueryOptions::new().matcher('/').unwrap();
        assert!(m.matches("ff0"));
        assert!(!m.matches("top/ff0"));
    }

    #[test]
    fn hierarchical_matches_leaf_names() {
        let m = QueryOptions::with_patterns(["ff*"]).hierarchical(true).matcher('/').unwrap();
        assert!(m.matches("top/u1/ff0"));
        assert!(!m.matches("top/u1/lut0"));
        assert!(m.matches("ff3"));
    }

    #[test]
    fn hsc_overrides_default_separator() {
        let q = QueryOptions::new().hsc('.').hierarchical(true).pattern("ff0");
        let m = q.matcher('/').unwrap();
        assert!(m.matches("top.ff0"));
        assert_eq!(q.separator('/'), '.');
    }
}
