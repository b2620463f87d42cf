// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Workflow settings.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `itk-perf.toml` in the working directory (optional), or an explicit file
//! 3. `ITK_PERF_*` environment variables, `__` separating nested keys
//!    (`ITK_PERF_GIRDER__API_KEY` sets `girder.api_key`)

use super::girder::{DEFAULT_API_URL, DEFAULT_FOLDER_ID};
use super::git::{BENCHMARKS_REPOSITORY, TOOLKIT_REPOSITORY};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default settings file name, without extension.
pub const DEFAULT_SETTINGS_FILE: &str = "itk-perf";

/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "ITK_PERF";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value is present but unusable
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// A git repository and the revision to check out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// Clone URL.
    pub repository: String,
    /// Tag, branch or commit.
    pub git_tag: String,
}

/// Girder upload target and credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GirderSettings {
    /// API root URL.
    pub api_url: String,
    /// Destination folder ID.
    pub folder_id: String,
    /// API key, preferred over username/password.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Account name.
    #[serde(default)]
    pub username: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for GirderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GirderSettings")
            .field("api_url", &self.api_url)
            .field("folder_id", &self.folder_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Effective workflow settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the result store; each host writes to a subdirectory.
    pub results_root: PathBuf,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Toolkit checkout.
    pub toolkit: RepositorySettings,
    /// Benchmark suite checkout.
    pub benchmarks: RepositorySettings,
    /// Upload target.
    pub girder: GirderSettings,
}

impl Settings {
    /// Load settings from defaults, the settings file and the process environment.
    ///
    /// `file` replaces the optional `itk-perf.toml` lookup and must exist.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_from(file, env_source())
    }

    /// Load settings with an explicit environment source.
    pub fn load_from(file: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("results_root", "results")?
            .set_default("log_level", "info")?
            .set_default("toolkit.repository", TOOLKIT_REPOSITORY)?
            .set_default("toolkit.git_tag", "master")?
            .set_default("benchmarks.repository", BENCHMARKS_REPOSITORY)?
            .set_default("benchmarks.git_tag", "master")?
            .set_default("girder.api_url", DEFAULT_API_URL)?
            .set_default("girder.folder_id", DEFAULT_FOLDER_ID)?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.results_root.as_os_str().is_empty() {
            return Err(SettingsError::Invalid {
                key: "results_root".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !self.girder.api_url.starts_with("http://") && !self.girder.api_url.starts_with("https://") {
            return Err(SettingsError::Invalid {
                key: "girder.api_url".to_string(),
                reason: format!("'{}' is not an http(s) URL", self.girder.api_url),
            });
        }
        Ok(())
    }
}

/// `ITK_PERF_*` variables, `__` separating nested keys.
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
