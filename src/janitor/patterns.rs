//! Branch name patterns

use crate::config::parse_csv;
use crate::error::{Error, Result};
use regex::Regex;

/// An ordered set of compiled branch-name patterns.
///
/// An empty set matches nothing. Callers that treat a set as a restriction
/// check [`PatternSet::is_empty`] first.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile a comma-separated pattern list.
    pub fn parse(list: &str) -> Result<Self> {
        Self::compile(&parse_csv(list))
    }

    /// Compile a list of regular expressions.
    ///
    /// Fails on the first malformed pattern.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(AsRef::as_ref)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(p).map_err(|source| Error::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True iff any pattern matches `name`. Always false for an empty set.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Whether no patterns are configured
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
