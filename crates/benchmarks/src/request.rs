//! Aggregation request and its builder.

use itk_perf_core::{Error, Result, Revision};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Parameters of one aggregation pass.
///
/// Built with [`AggregationRequest::builder`], which rejects a request
/// without a results directory or without revisions.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    results_dir: PathBuf,
    revisions: Vec<Revision>,
    benchmark_filter: Option<HashSet<String>>,
    revision_labels: Option<Vec<String>>,
}

impl AggregationRequest {
    /// Create a new builder.
    pub fn builder() -> AggregationRequestBuilder {
        AggregationRequestBuilder::default()
    }

    /// Directory holding the result files of one host.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Requested revisions, in caller order.
    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    /// Benchmark-name allow-list, if any.
    pub fn benchmark_filter(&self) -> Option<&HashSet<String>> {
        self.benchmark_filter.as_ref()
    }

    /// Position of the first requested revision whose short form occurs in
    /// `filename`. `None` means the file is not a candidate.
    pub fn matching_revision(&self, filename: &str) -> Option<usize> {
        self.revisions
            .iter()
            .position(|rev| rev.matches_filename(filename))
    }

    /// Label override for the revision at `index`, if one was supplied.
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.revision_labels
            .as_ref()
            .and_then(|labels| labels.get(index))
            .map(String::as_str)
    }

    /// Whether samples from `probe_name` are kept.
    pub fn accepts_benchmark(&self, probe_name: &str) -> bool {
        match &self.benchmark_filter {
            Some(filter) => filter.contains(probe_name),
            None => true,
        }
    }
}

/// Builder for [`AggregationRequest`].
#[derive(Debug, Default)]
pub struct AggregationRequestBuilder {
    results_dir: Option<PathBuf>,
    revisions: Vec<Revision>,
    benchmark_filter: Option<HashSet<String>>,
    revision_labels: Option<Vec<String>>,
}

impl AggregationRequestBuilder {
    /// Set the results directory (required).
    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = Some(dir.into());
        self
    }

    /// Add one requested revision.
    pub fn revision(mut self, revision: impl Into<Revision>) -> Self {
        self.revisions.push(revision.into());
        self
    }

    /// Add requested revisions (at least one is required overall).
    pub fn revisions<I, R>(mut self, revisions: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Revision>,
    {
        self.revisions.extend(revisions.into_iter().map(Into::into));
        self
    }

    /// Add one name to the benchmark allow-list, creating it if needed.
    pub fn benchmark(mut self, name: impl Into<String>) -> Self {
        self.benchmark_filter
            .get_or_insert_with(HashSet::new)
            .insert(name.into());
        self
    }

    /// Set the benchmark allow-list. An empty list filters out everything.
    pub fn benchmarks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benchmark_filter
            .get_or_insert_with(HashSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Set label overrides, matched to revisions by position.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.revision_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Build the [`AggregationRequest`]. Returns `Err` if required fields are missing.
    pub fn build(self) -> Result<AggregationRequest> {
        let results_dir = self
            .results_dir
            .ok_or_else(|| Error::configuration("results directory is required"))?;
        if self.revisions.is_empty() {
            return Err(Error::configuration("at least one revision is required"));
        }

        Ok(AggregationRequest {
            results_dir,
            revisions: self.revisions,
            benchmark_filter: self.benchmark_filter,
            revision_labels: self.revision_labels,
        })
    }
}
