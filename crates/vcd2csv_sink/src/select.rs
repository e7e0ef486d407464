//! Signal selection by substring, exact or regular-expression match.

use std::collections::HashSet;

use regex::Regex;

use crate::error::SinkError;

/// How a pattern is compared against reference names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// The name contains the pattern (case-sensitive).
    #[default]
    Substring,
    /// The name equals the pattern.
    Exact,
    /// The pattern is a regular expression found anywhere in the name.
    Regex,
}

#[derive(Clone, Debug)]
enum Pattern {
    Substring(String),
    Exact(String),
    Regex(Regex),
}

impl Pattern {
    fn compile(pattern: &str, mode: MatchMode) -> Result<Self, SinkError> {
        Ok(match mode {
            MatchMode::Substring => Self::Substring(pattern.to_string()),
            MatchMode::Exact => Self::Exact(pattern.to_string()),
            MatchMode::Regex => Self::Regex(Regex::new(pattern).map_err(|source| {
                SinkError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                }
            })?),
        })
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Substring(p) => name.contains(p.as_str()),
            Self::Exact(p) => name == p,
            Self::Regex(re) => re.is_match(name),
        }
    }
}

/// A compiled set of signal patterns.
///
/// An empty selection (no patterns) means "every signal"; what that expands
/// to is up to the consumer.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    patterns: Vec<Pattern>,
}

impl Selection {
    /// Selects every signal.
    pub fn all() -> Self {
        Self::default()
    }

    /// Compiles the given patterns.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::InvalidRegex`] in [`MatchMode::Regex`] for a
    /// pattern that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S], mode: MatchMode) -> Result<Self, SinkError> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::compile(p.as_ref(), mode))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns `true` if no patterns were given.
    pub fn is_all(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Resolves the patterns against reference names.
    ///
    /// Patterns are applied in order; each one appends the names it matches
    /// in the order given, skipping names already selected. With no patterns
    /// every name is returned.
    pub fn resolve(&self, references: &[String]) -> Vec<String> {
        if self.is_all() {
            return references.to_vec();
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut selected: Vec<String> = Vec::new();
        for pattern in &self.patterns {
            for name in references {
                if pattern.matches(name) && seen.insert(name.as_str()) {
                    selected.push(name.clone());
                }
            }
        }
        if selected.is_empty() {
            log::warn!("no signals match the given patterns");
        }
        selected
    }
}

/// Compiles `patterns` and resolves them against `references` in one step.
///
/// # Errors
///
/// Returns [`SinkError::InvalidRegex`] for an invalid regular expression.
pub fn select_signals<S: AsRef<str>>(
    references: &[String],
    patterns: &[S],
    mode: MatchMode,
) -> Result<Vec<String>, SinkError> {
    Ok(Selection::new(patterns, mode)?.resolve(references))
}
