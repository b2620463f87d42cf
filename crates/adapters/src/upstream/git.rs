// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Git adapter for the toolkit and benchmark checkouts.
//!
//! # Example
//!
//! ```ignore
//! use itk_perf_adapters::upstream::git::GitAdapter;
//! use itk_perf_adapters::upstream::command::SystemCommandRunner;
//!
//! let git = GitAdapter::new(SystemCommandRunner);
//! git.ensure_clone(TOOLKIT_REPOSITORY, "/src/ITK".as_ref())?;
//! git.checkout("/src/ITK".as_ref(), "v5.0.0")?;
//! let info = git.build_information("/src/ITK".as_ref())?;
//! ```

use super::command::{CommandError, CommandRunner, Invocation, Result};
use itk_perf_core::BuildInformation;
use std::fs;
use std::path::Path;
use tracing::info;

/// Default toolkit repository.
pub const TOOLKIT_REPOSITORY: &str = "https://github.com/InsightSoftwareConsortium/ITK.git";

/// Default benchmark suite repository.
pub const BENCHMARKS_REPOSITORY: &str =
    "https://github.com/InsightSoftwareConsortium/ITKPerformanceBenchmarking.git";

/// Toolkit commit that introduced `itk::BuildInformation`.
///
/// Checkouts whose `HEAD` is an ancestor of it cannot report build
/// information themselves.
pub const BUILD_INFORMATION_COMMIT: &str = "fca883daf05ac62ee0449513dbd2ad30ff9591f0";

/// Adapter running git through a [`CommandRunner`].
pub struct GitAdapter<R> {
    runner: R,
}

impl<R: CommandRunner> GitAdapter<R> {
    /// Create a new adapter.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn git(&self, dir: &Path) -> Invocation {
        Invocation::new("git").current_dir(dir)
    }

    /// Clone `url` into `dir` unless `dir` already holds a repository.
    ///
    /// Returns whether a clone happened.
    pub fn ensure_clone(&self, url: &str, dir: &Path) -> Result<bool> {
        if dir.join(".git").exists() {
            return Ok(false);
        }
        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CommandError::io(parent, e))?;
        }
        info!(url, dir = %dir.display(), "Cloning repository");
        self.runner.run(
            &Invocation::new("git")
                .arg("clone")
                .arg(url)
                .arg(dir.to_string_lossy()),
        )?;
        Ok(true)
    }

    /// Stash local changes, then hard-reset to `tag`.
    pub fn checkout(&self, dir: &Path, tag: &str) -> Result<()> {
        self.runner.run(&self.git(dir).arg("stash"))?;
        self.runner
            .run(&self.git(dir).args(["reset", "--hard", tag]))
    }

    /// Commit hash, commit date and local modifications of `HEAD`.
    pub fn build_information(&self, dir: &Path) -> Result<BuildInformation> {
        let sha = self
            .runner
            .output(&self.git(dir).args(["rev-parse", "HEAD"]))?;
        let date = self
            .runner
            .output(&self.git(dir).args(["show", "-s", "--format=%ci", "HEAD"]))?;
        let modifications = self
            .runner
            .output(&self.git(dir).args(["diff", "--shortstat", "HEAD"]))?;
        Ok(BuildInformation::new(sha, date, modifications))
    }

    /// Whether `ancestor` is an ancestor of `descendant`.
    ///
    /// A failing `merge-base` (including an unknown commit) counts as "no".
    pub fn is_ancestor(&self, dir: &Path, ancestor: &str, descendant: &str) -> Result<bool> {
        let invocation = self
            .git(dir)
            .args(["merge-base", "--is-ancestor", ancestor, descendant]);
        match self.runner.run(&invocation) {
            Ok(()) => Ok(true),
            Err(CommandError::Failed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the checkout at `dir` provides `itk::BuildInformation`.
    pub fn has_build_information(&self, dir: &Path) -> Result<bool> {
        Ok(!self.is_ancestor(dir, "HEAD", BUILD_INFORMATION_COMMIT)?)
    }
}
