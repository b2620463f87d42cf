// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Build metadata handed to a benchmark run.
//!
//! The benchmark executables embed this document into every result file under
//! `ITK_MANUAL_BUILD_INFO`. It reaches them through the
//! [`AUX_JSON_ENV`] variable of the test runner's environment, which callers
//! set on the child process only.

use serde::{Deserialize, Serialize};

/// Environment variable read by the benchmark executables.
pub const AUX_JSON_ENV: &str = "ITKPERFORMANCEBENCHMARK_AUX_JSON";

/// Key under which the build information is embedded in result files.
pub const MANUAL_BUILD_INFO_KEY: &str = "ITK_MANUAL_BUILD_INFO";

/// Git metadata of the toolkit checkout being benchmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInformation {
    /// Full commit hash of `HEAD`.
    #[serde(rename = "GIT_CONFIG_SHA1")]
    pub git_sha: String,
    /// Commit date of `HEAD` (`git show -s --format=%ci`).
    #[serde(rename = "GIT_CONFIG_DATE")]
    pub git_date: String,
    /// `git diff --shortstat HEAD` output; empty for a clean tree.
    #[serde(rename = "GIT_LOCAL_MODIFICATIONS")]
    pub local_modifications: String,
}

impl BuildInformation {
    /// Create build information from trimmed git output.
    pub fn new(
        git_sha: impl Into<String>,
        git_date: impl Into<String>,
        local_modifications: impl Into<String>,
    ) -> Self {
        Self {
            git_sha: git_sha.into().trim().to_string(),
            git_date: git_date.into().trim().to_string(),
            local_modifications: local_modifications.into().trim().to_string(),
        }
    }

    /// Whether the checkout has uncommitted changes.
    pub fn has_local_modifications(&self) -> bool {
        !self.local_modifications.is_empty()
    }

    /// The auxiliary JSON document: `{"ITK_MANUAL_BUILD_INFO": {...}}`.
    pub fn to_aux_json(&self) -> serde_json::Value {
        serde_json::json!({ MANUAL_BUILD_INFO_KEY: self })
    }

    /// The auxiliary JSON document as a string, ready for [`AUX_JSON_ENV`].
    pub fn to_aux_json_string(&self) -> String {
        self.to_aux_json().to_string()
    }
}
