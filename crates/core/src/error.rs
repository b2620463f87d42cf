// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for result aggregation.
//!
//! Every variant here is fatal: the aggregation pass stops and no partial
//! dataset is returned. Records skipped by the benchmark-name filter and
//! revisions without any result file are not errors and never show up here.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading and aggregating benchmark results.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid request or settings, detected before any file I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A candidate result file could not be parsed as a result record.
    #[error(
        "Malformed result record {}: {reason}\n--- file content ---\n{content}",
        path.display()
    )]
    MalformedRecord {
        /// File that failed to parse.
        path: PathBuf,
        /// Raw file content, kept for diagnosis.
        content: String,
        /// Parser message.
        reason: String,
    },

    /// Reading or listing a path failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding of a dataset failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Build a [`Error::MalformedRecord`].
    pub fn malformed_record(
        path: impl AsRef<Path>,
        content: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Error::MalformedRecord {
            path: path.as_ref().to_path_buf(),
            content: content.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::Io`].
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error came from an unparseable result file.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
