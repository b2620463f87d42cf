// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! CMake, Ninja and CTest adapter.
//!
//! Configures and builds the toolkit and the benchmark suite, then runs the
//! suite through CTest with the build information of the toolkit checkout in
//! the child environment.

use super::command::{CommandError, CommandRunner, Invocation, Result};
use itk_perf_core::build_info::AUX_JSON_ENV;
use itk_perf_core::BuildInformation;
use std::fs;
use std::path::Path;
use tracing::info;

/// CMake generator used for every build tree.
pub const GENERATOR: &str = "Ninja";

/// Options shared by the toolkit and benchmark configurations.
pub const COMMON_CACHE_ENTRIES: &[&str] = &[
    "-DCMAKE_BUILD_TYPE:STRING=Release",
    "-DCMAKE_CXX_STANDARD:STRING=11",
];

/// Adapter running CMake, Ninja and CTest through a [`CommandRunner`].
pub struct CMakeAdapter<R> {
    runner: R,
}

impl<R: CommandRunner> CMakeAdapter<R> {
    /// Create a new adapter.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn configure(&self, source: &Path, binary: &Path, extra: Vec<String>) -> Result<()> {
        fs::create_dir_all(binary).map_err(|e| CommandError::io(binary, e))?;
        let invocation = Invocation::new("cmake")
            .current_dir(binary)
            .args(["-G", GENERATOR])
            .args(COMMON_CACHE_ENTRIES.iter().copied())
            .args(extra)
            .arg(source.to_string_lossy());
        info!(source = %source.display(), binary = %binary.display(), "Configuring");
        self.runner.run(&invocation)
    }

    /// Configure a release toolkit build without tests or examples.
    pub fn configure_toolkit(&self, source: &Path, binary: &Path) -> Result<()> {
        self.configure(
            source,
            binary,
            vec![
                "-DBUILD_TESTING:BOOL=OFF".to_string(),
                "-DBUILD_EXAMPLES:BOOL=OFF".to_string(),
            ],
        )
    }

    /// Configure the benchmark suite against the toolkit build in `toolkit_binary`.
    ///
    /// Result files are written to `results_dir`.
    pub fn configure_benchmarks(
        &self,
        source: &Path,
        binary: &Path,
        toolkit_binary: &Path,
        has_build_information: bool,
        results_dir: &Path,
    ) -> Result<()> {
        let information = if has_build_information { "ON" } else { "OFF" };
        self.configure(
            source,
            binary,
            vec![
                format!("-DITK_DIR:PATH={}", toolkit_binary.display()),
                format!("-DITK_HAS_INFORMATION_H:BOOL={}", information),
                format!("-DBENCHMARK_RESULTS_OUTPUT_DIR:PATH={}", results_dir.display()),
            ],
        )
    }

    /// Build a configured tree with Ninja.
    pub fn build(&self, binary: &Path) -> Result<()> {
        info!(binary = %binary.display(), "Building");
        self.runner
            .run(&Invocation::new("ninja").current_dir(binary))
    }

    /// Run the benchmark suite.
    ///
    /// `build_information` reaches the benchmark executables through the
    /// CTest process environment.
    pub fn run_benchmarks(&self, binary: &Path, build_information: &BuildInformation) -> Result<()> {
        info!(
            binary = %binary.display(),
            sha = %build_information.git_sha,
            "Running benchmarks"
        );
        self.runner.run(
            &Invocation::new("ctest")
                .current_dir(binary)
                .env(AUX_JSON_ENV, build_information.to_aux_json_string()),
        )
    }
}
