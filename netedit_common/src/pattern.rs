//! Name pattern compilation.
//!
//! Query patterns are globs by default (`*` and `?`) or full regular
//! expressions. Both compile down to an anchored [`Regex`].

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::CommonError;

/// How glob wildcards treat the hierarchy separator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStyle {
    /// Wildcards stop at the hierarchy separator.
    #[default]
    Sdc,
    /// Wildcards match across hierarchy levels.
    Ucf,
}

/// Knobs controlling how a pattern string becomes a matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternOptions {
    /// Treat patterns as regular expressions.
    pub regexp: bool,
    /// Match case-insensitively.
    pub nocase: bool,
    /// Glob wildcard behaviour.
    pub match_style: MatchStyle,
    /// Hierarchy separator.
    pub separator: char,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            regexp: false,
            nocase: false,
            match_style: MatchStyle::Sdc,
            separator: '/',
        }
    }
}

/// A compiled name pattern.
#[derive(Clone, Debug)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    /// Compiles `pattern` under `options`.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::InvalidPattern`] if the resulting expression does not compile.
    pub fn compile(pattern: &str, options: &PatternOptions) -> Result<Self, CommonError> {
        let expr = if options.regexp {
            format!("^(?:{pattern})$")
        } else {
            glob_to_regex(pattern, options.match_style, options.separator)
        };
        let regex = RegexBuilder::new(&expr)
            .case_insensitive(options.nocase)
            .build()
            .map_err(|source| CommonError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    /// A glob that may cross hierarchy levels, as used by `=~` in filters.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::InvalidPattern`] if the glob does not compile.
    pub fn glob(pattern: &str, nocase: bool) -> Result<Self, CommonError> {
        Self::compile(
            pattern,
            &PatternOptions {
                nocase,
                match_style: MatchStyle::Ucf,
                ..PatternOptions::default()
            },
        )
    }

    /// Returns true if `name` matches the whole pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

fn glob_to_regex(glob: &str, style: MatchStyle, separator: char) -> String {
    let any = match style {
        MatchStyle::Sdc => format!("[^{}]", regex::escape(separator.encode_utf8(&mut [0; 4]))),
        MatchStyle::Ucf => ".".to_string(),
    };
    let mut expr = String::with_capacity(glob.len() * 2 + 2);
    expr.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => {
                expr.push_str(&any);
                expr.push('*');
            }
            '?' => expr.push_str(&any),
            c => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compile(pattern: &str, options: PatternOptions) -> NamePattern {
        NamePattern::compile(pattern, &options).unwrap()
    }

    #[rstest]
    #[case::star_top_level("*", "ff0", true)]
    #[case::star_stops_at_separator("*", "top/ff0", false)]
    #[case::prefix("ff*", "ff12", true)]
    #[case::question("ff?", "ff1", true)]
    #[case::question_one_char("ff?", "ff12", false)]
    #[case::dots_are_literal("a.b", "axb", false)]
    #[case::explicit_level("top/*", "top/ff0", true)]
    fn sdc_globs(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        assert_eq!(compile(pattern, PatternOptions::default()).matches(name), expected);
    }

    #[test]
    fn ucf_globs_cross_levels() {
        let opts = PatternOptions {
            match_style: MatchStyle::Ucf,
            ..PatternOptions::default()
        };
        assert!(compile("*ff0", opts).matches("top/u1/ff0"));
    }

    #[test]
    fn custom_separator() {
        let opts = PatternOptions {
            separator: '.',
            ..PatternOptions::default()
        };
        assert!(compile("*", opts).matches("top/ff0"));
        assert!(!compile("*", opts).matches("top.ff0"));
    }

    #[test]
    fn regexp_is_anchored() {
        let opts = PatternOptions {
            regexp: true,
            ..PatternOptions::default()
        };
        assert!(compile("ff[0-9]+", opts).matches("ff10"));
        assert!(!compile("ff[0-9]+", opts).matches("xff10"));
    }

    #[test]
    fn nocase() {
        let opts = PatternOptions {
            nocase: true,
            ..PatternOptions::default()
        };
        assert!(compile("FF*", opts).matches("ff0"));
        assert!(!compile("FF*", PatternOptions::default()).matches("ff0"));
    }

    #[test]
    fn bad_regexp_is_reported() {
        let opts = PatternOptions {
            regexp: true,
            ..PatternOptions::default()
        };
        assert!(matches!(
            NamePattern::compile("ff[", &opts),
            Err(CommonError::InvalidPattern { .. })
        ));
    }
}
