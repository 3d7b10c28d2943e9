// Copyright (c) The diffrunner Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A filter over test-case file names.
#[derive(Clone, Debug)]
pub struct TestFilter {
    name_match: NameMatch,
}

#[derive(Clone, Debug)]
enum NameMatch {
    MatchAll,
    MatchSet(Box<AhoCorasick>),
}

impl TestFilter {
    /// Creates a new `TestFilter` from the given patterns.
    ///
    /// If an empty slice is passed, the filter matches all possible test-case
    /// names.
    pub fn new(patterns: &[impl AsRef<[u8]>]) -> Self {
        let name_match = if patterns.is_empty() {
            NameMatch::MatchAll
        } else {
            NameMatch::MatchSet(Box::new(AhoCorasick::new_auto_configured(patterns)))
        };
        Self { name_match }
    }

    /// Creates a new `TestFilter` that matches every test case.
    pub fn any() -> Self {
        Self {
            name_match: NameMatch::MatchAll,
        }
    }

    /// Returns an enum describing the match status of this filter.
    pub fn filter_match(&self, file_name: &str) -> FilterMatch {
        let string_match = match &self.name_match {
            NameMatch::MatchAll => true,
            NameMatch::MatchSet(set) => set.is_match(file_name),
        };
        if string_match {
            FilterMatch::Matches
        } else {
            FilterMatch::Mismatch {
                reason: MismatchReason::String,
            }
        }
    }
}

/// An enum describing whether a test case matches a filter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", tag = "status")]
pub enum FilterMatch {
    /// This test case matches this filter.
    Matches,

    /// This test case does not match this filter.
    ///
    /// The `MismatchReason` inside describes the reason this filter isn't
    /// matched.
    Mismatch { reason: MismatchReason },
}

impl FilterMatch {
    /// Returns true if the filter matches.
    pub fn is_match(&self) -> bool {
        matches!(self, FilterMatch::Matches)
    }
}

/// The reason for why a test case doesn't match a filter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchReason {
    /// This test case does not match the provided string filters.
    String,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MismatchReason::String => write!(f, "does not match the provided string filters"),
        }
    }
}
