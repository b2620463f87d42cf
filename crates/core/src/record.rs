// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result records.
//!
//! A result file is the JSON report written by a benchmark executable once its
//! probes have stopped, decorated with the build information of the toolkit
//! it was linked against:
//!
//! ```text
//! {
//!   "ITK_MANUAL_BUILD_INFO": { "GIT_CONFIG_SHA1": ..., "GIT_CONFIG_DATE": ... },
//!   "SystemInformation":     { "ITKVersion": ... },
//!   "Probes":                [ { "Name": ..., "Values": [ ... ] }, ... ]
//! }
//! ```
//!
//! Only the first probe of a report is kept.

use crate::error::{Error, Result};
use crate::revision::Revision;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "ITK_MANUAL_BUILD_INFO")]
    build_info: RawBuildInfo,
    #[serde(rename = "SystemInformation")]
    system_information: RawSystemInformation,
    #[serde(rename = "Probes")]
    probes: Vec<RawProbe>,
}

#[derive(Debug, Deserialize)]
struct RawBuildInfo {
    #[serde(rename = "GIT_CONFIG_SHA1")]
    sha: String,
    #[serde(rename = "GIT_CONFIG_DATE")]
    date: String,
}

#[derive(Debug, Deserialize)]
struct RawSystemInformation {
    #[serde(rename = "ITKVersion")]
    itk_version: String,
}

#[derive(Debug, Deserialize)]
struct RawProbe {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Values")]
    values: Vec<f64>,
}

/// One parsed measurement file.
///
/// Immutable once parsed; belongs to exactly one revision and one probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    revision_sha: Revision,
    toolkit_version: String,
    config_date: String,
    probe_name: String,
    probe_values: Vec<f64>,
}

impl ResultRecord {
    /// Parse the content of the result file at `path`.
    ///
    /// Invalid JSON, a missing required field and an empty probe list all
    /// yield [`Error::MalformedRecord`] carrying the raw content.
    pub fn parse(path: impl AsRef<Path>, content: &str) -> Result<Self> {
        let path = path.as_ref();
        let raw: RawRecord = serde_json::from_str(content)
            .map_err(|e| Error::malformed_record(path, content, e))?;

        let probe = raw
            .probes
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed_record(path, content, "record contains no probes"))?;

        Ok(Self {
            revision_sha: Revision::new(raw.build_info.sha),
            toolkit_version: raw.system_information.itk_version,
            config_date: raw.build_info.date,
            probe_name: probe.name,
            probe_values: probe.values,
        })
    }

    /// Read and parse a result file written for `revision`.
    ///
    /// Content that is not UTF-8, or whose embedded commit does not start
    /// with `revision`'s short form, is an [`Error::MalformedRecord`].
    pub fn load(path: impl AsRef<Path>, revision: &Revision) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                let reason = e.utf8_error();
                return Err(Error::malformed_record(
                    path,
                    String::from_utf8_lossy(e.as_bytes()),
                    reason,
                ));
            }
        };

        let record = Self::parse(path, &content)?;
        if !revision.matches_sha(&record.revision_sha) {
            return Err(Error::malformed_record(
                path,
                content,
                format!(
                    "file is named for revision {} but records commit {}",
                    revision.short_form(),
                    record.revision_sha
                ),
            ));
        }
        Ok(record)
    }

    /// Revision the benchmark was built from.
    pub fn revision_sha(&self) -> &Revision {
        &self.revision_sha
    }

    /// Version of the toolkit under test.
    pub fn toolkit_version(&self) -> &str {
        &self.toolkit_version
    }

    /// When the revision was configured.
    pub fn config_date(&self) -> &str {
        &self.config_date
    }

    /// Name of the first probe.
    pub fn probe_name(&self) -> &str {
        &self.probe_name
    }

    /// Samples of the first probe, in recorded order.
    pub fn probe_values(&self) -> &[f64] {
        &self.probe_values
    }

    /// Label used when the caller does not supply one:
    /// `"<version> <config date> <sha[:7]>"`.
    pub fn derived_label(&self) -> String {
        format!(
            "{} {} {}",
            self.toolkit_version,
            self.config_date,
            self.revision_sha.abbreviated()
        )
    }
}
