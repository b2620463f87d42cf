// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adapters for the tools and services around a benchmark run.
//!
//! - **Command**: process execution seam shared by the tool adapters
//! - **Toolchain**: required-program check
//! - **Git**: toolkit and benchmark checkouts, build information
//! - **CMake**: configure, build and CTest runs
//! - **Girder**: result upload
//! - **Plotly**: comparison chart rendering
//! - **Settings**: layered workflow configuration
//!
//! # Example
//!
//! ```ignore
//! use itk_perf_adapters::upstream::prelude::*;
//!
//! let settings = Settings::load(None)?;
//! check_required_programs(&SystemCommandRunner)?;
//! let git = GitAdapter::new(SystemCommandRunner);
//! let cmake = CMakeAdapter::new(SystemCommandRunner);
//! ```

pub mod cmake;
pub mod command;
pub mod git;
pub mod girder;
pub mod plotly;
pub mod settings;
pub mod toolchain;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::cmake::CMakeAdapter;
    pub use super::command::{CommandError, CommandRunner, Invocation, SystemCommandRunner};
    pub use super::git::GitAdapter;
    pub use super::girder::{Credentials, GirderClient, GirderError};
    pub use super::plotly::{PlotlyRenderer, RenderError};
    pub use super::settings::{Settings, SettingsError};
    pub use super::toolchain::check_required_programs;
}

/// Re-export all adapters at module level.
pub use cmake::CMakeAdapter;
pub use git::GitAdapter;
pub use girder::GirderClient;
pub use plotly::PlotlyRenderer;
pub use settings::Settings;
