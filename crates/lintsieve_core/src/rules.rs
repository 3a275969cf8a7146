//! Signed glob rules for enabling and disabling codes.
//!
//! A rule is `+<glob>` (include) or `-<glob>` (exclude). A code is matched
//! against a rule list in two passes:
//!
//! 1. Scanning backwards, the first rule whose pattern equals the code
//!    (case-insensitively) decides. An explicit rule is never shadowed by a
//!    later wildcard.
//! 2. Otherwise every rule whose glob matches the code overrides the result
//!    of the previous one, so the last matching rule decides. No match means
//!    the code is excluded.
//!
//! `["+*", "-E5*", "+E501"]` therefore enables everything except `E5xx`,
//! except `E501`.

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::LinterError;

/// Code used for files that could not be read and checks that failed.
pub const CHECK_ERROR_CODE: &str = "E902";

/// Code used by checks for files that do not parse.
pub const SYNTAX_ERROR_CODE: &str = "E999";

/// Codes reported whatever the rules say: they mean the file was not
/// checked at all.
pub const ALWAYS_REPORTED: &[&str] = &[CHECK_ERROR_CODE, SYNTAX_ERROR_CODE];

/// Whether a rule enables or disables what it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Include,
    Exclude,
}

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    raw: String,
    sign: Sign,
    matcher: GlobMatcher,
}

impl Rule {
    /// Parses and compiles a rule string.
    pub fn parse(raw: &str) -> Result<Self, LinterError> {
        let mut chars = raw.chars();
        let sign = match chars.next() {
            Some('+') => Sign::Include,
            Some('-') => Sign::Exclude,
            _ => return Err(LinterError::invalid_rule(raw)),
        };
        let pattern = chars.as_str();
        if pattern.is_empty() {
            return Err(LinterError::invalid_rule(raw));
        }

        Ok(Self {
            raw: raw.to_string(),
            sign,
            matcher: compile_glob(pattern).map_err(|_| LinterError::invalid_rule(raw))?,
        })
    }

    /// The rule as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The pattern without its sign.
    pub fn pattern(&self) -> &str {
        &self.raw[1..]
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    fn includes(&self) -> bool {
        self.sign == Sign::Include
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compiles a glob the way `fnmatch` reads it: `*` also matches `/`.
pub(crate) fn compile_glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()?
        .compile_matcher())
}

/// An ordered list of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl RuleList {
    /// Parses a list of rule strings. Any malformed rule fails the whole list.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, LinterError> {
        let rules = raw
            .iter()
            .map(|rule| Rule::parse(rule.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Appends `other` after the rules of this list.
    pub fn extend(&mut self, other: &RuleList) {
        self.rules.extend(other.rules.iter().cloned());
    }

    /// Decides whether `code` is reported under this list.
    pub fn includes(&self, code: &str) -> bool {
        if ALWAYS_REPORTED.contains(&code) {
            return true;
        }

        if let Some(rule) = self
            .rules
            .iter()
            .rev()
            .find(|rule| rule.pattern().eq_ignore_ascii_case(code))
        {
            return rule.includes();
        }

        let mut include = false;
        for rule in &self.rules {
            if rule.matcher.is_match(code) {
                include = rule.includes();
            }
        }
        include
    }

    /// True when the list cannot enable anything: it is empty or every rule
    /// is `-*`. Units under such a list are never run.
    pub fn excludes_everything(&self) -> bool {
        self.rules.iter().all(|rule| rule.raw == "-*")
    }

    /// The rules as written, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.raw.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Decides whether `code` is reported under the raw rule strings `rules`.
///
/// Fails if any rule is malformed, even one that would not be consulted.
pub fn check_include<S: AsRef<str>>(code: &str, rules: &[S]) -> Result<bool, LinterError> {
    Ok(RuleList::parse(rules)?.includes(code))
}
