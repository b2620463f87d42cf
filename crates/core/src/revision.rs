// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Source revision identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading characters used to match a revision against file names.
pub const SHORT_FORM_LEN: usize = 10;

/// Number of leading characters shown in derived series labels.
pub const ABBREVIATED_LEN: usize = 7;

/// A source-control commit hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Wrap a commit hash.
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    /// The full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first [`SHORT_FORM_LEN`] characters, or the whole identifier if shorter.
    pub fn short_form(&self) -> &str {
        leading_chars(&self.0, SHORT_FORM_LEN)
    }

    /// The first [`ABBREVIATED_LEN`] characters, or the whole identifier if shorter.
    pub fn abbreviated(&self) -> &str {
        leading_chars(&self.0, ABBREVIATED_LEN)
    }

    /// Whether `filename` contains this revision's short form.
    pub fn matches_filename(&self, filename: &str) -> bool {
        filename.contains(self.short_form())
    }

    /// Whether `sha`, as embedded in a result file, starts with this
    /// revision's short form.
    pub fn matches_sha(&self, sha: &Revision) -> bool {
        sha.0.starts_with(self.short_form())
    }
}

fn leading_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form_truncates_to_ten_characters() {
        let rev = Revision::new("fca883daf05ac62ee0449513dbd2ad30ff9591f0");
        assert_eq!(rev.short_form(), "fca883daf0");
        assert_eq!(rev.abbreviated(), "fca883d");
    }

    #[test]
    fn test_short_identifiers_are_kept_whole() {
        let rev = Revision::new("abc12");
        assert_eq!(rev.short_form(), "abc12");
        assert_eq!(rev.abbreviated(), "abc12");
    }

    #[test]
    fn test_matches_filename_by_short_form() {
        let rev = Revision::new("abc1234567deadbeef");
        assert!(rev.matches_filename("Read_abc1234567ffff_2024.json"));
        assert!(!rev.matches_filename("Read_abc123456_2024.json"));
    }

    #[test]
    fn test_matches_sha_by_prefix() {
        let requested = Revision::new("abc1234567");
        assert!(requested.matches_sha(&Revision::new("abc1234567890def")));
        assert!(!requested.matches_sha(&Revision::new("bbb9876543210fed")));
        assert!(!requested.matches_sha(&Revision::new("xxabc1234567")));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let rev = Revision::new("abc");
        assert_eq!(serde_json::to_string(&rev).unwrap(), "\"abc\"");
    }
}
