//! Filter — optional raw-line prefilter applied before field extraction.
//!
//! Lets a query drop noise (health checks, debug chatter) or keep only lines
//! mentioning something, without touching the extraction pattern.

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Keep only lines that match.
    Include,
    /// Drop lines that match.
    Exclude,
}

pub struct LineFilter {
    matcher: RegexMatcher,
    mode: FilterMode,
}

impl std::fmt::Debug for LineFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineFilter")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl LineFilter {
    pub fn new(pattern: &str, case_sensitive: bool, mode: FilterMode) -> Result<Self, FilterError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(!case_sensitive)
            .multi_line(false)
            .build(pattern)
            .map_err(|e| FilterError::InvalidRegex(e.to_string()))?;

        Ok(Self { matcher, mode })
    }

    pub fn include(pattern: &str) -> Result<Self, FilterError> {
        Self::new(pattern, false, FilterMode::Include)
    }

    pub fn exclude(pattern: &str) -> Result<Self, FilterError> {
        Self::new(pattern, false, FilterMode::Exclude)
    }

    #[inline]
    pub fn should_keep(&self, line: &str) -> bool {
        let matches = self.matcher.is_match(line.as_bytes()).unwrap_or(false);
        match self.mode {
            FilterMode::Include => matches,
            FilterMode::Exclude => !matches,
        }
    }
}
