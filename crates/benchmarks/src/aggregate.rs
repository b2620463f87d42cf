//! Revision comparison aggregation.
//!
//! Scans one host's results directory for files belonging to the requested
//! revisions and groups their samples into one [`Series`] per revision.
//!
//! The pass is a single sequential scan in filename order, so sample order
//! within a series is reproducible. A file that cannot be parsed aborts the
//! whole pass; a record whose benchmark is not in the allow-list is skipped.

use crate::dataset::{ComparisonDataset, Series};
use crate::request::AggregationRequest;
use itk_perf_core::{Error, Result, ResultRecord, Revision};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// What happened to one parsed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Samples were appended to the revision's series.
    Accepted {
        /// Number of samples appended.
        samples: usize,
    },
    /// The record's benchmark is not in the allow-list.
    FilteredOut,
}

/// A result file selected for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File path.
    pub path: PathBuf,
    /// File name used for matching.
    pub filename: String,
    /// Position of the requested revision the file name matched.
    pub revision_index: usize,
}

/// Insertion-ordered map from revision to series.
#[derive(Debug, Default)]
struct SeriesMap {
    series: Vec<Series>,
    index: HashMap<Revision, usize>,
}

impl SeriesMap {
    fn get_or_insert_with(
        &mut self,
        revision: &Revision,
        label: impl FnOnce() -> String,
    ) -> &mut Series {
        let idx = match self.index.get(revision) {
            Some(&idx) => idx,
            None => {
                self.series.push(Series::new(revision.clone(), label()));
                let idx = self.series.len() - 1;
                self.index.insert(revision.clone(), idx);
                idx
            }
        };
        &mut self.series[idx]
    }

    /// Series that received no sample are dropped.
    fn into_dataset(self) -> ComparisonDataset {
        ComparisonDataset::from_series(
            self.series.into_iter().filter(|s| !s.is_empty()).collect(),
        )
    }
}

/// Run one aggregation pass.
pub fn aggregate(request: &AggregationRequest) -> Result<ComparisonDataset> {
    Aggregator::new(request).run()
}

/// List the candidate files of `request`, sorted by file name.
///
/// Fails with [`Error::Configuration`] if the results directory does not exist.
pub fn candidate_files(request: &AggregationRequest) -> Result<Vec<Candidate>> {
    let dir = request.results_dir();
    if !dir.is_dir() {
        return Err(Error::configuration(format!(
            "results directory {} does not exist",
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        entries.push((filename, entry.path()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(entries
        .into_iter()
        .filter(|(_, path)| path.is_file())
        .filter_map(|(filename, path)| {
            request
                .matching_revision(&filename)
                .map(|revision_index| Candidate {
                    path,
                    filename,
                    revision_index,
                })
        })
        .collect())
}

/// Stateful aggregation pass over one request.
pub struct Aggregator<'a> {
    request: &'a AggregationRequest,
    series: SeriesMap,
}

impl<'a> Aggregator<'a> {
    /// Start an empty pass.
    pub fn new(request: &'a AggregationRequest) -> Self {
        Self {
            request,
            series: SeriesMap::default(),
        }
    }

    /// Process every candidate file and return the dataset.
    pub fn run(mut self) -> Result<ComparisonDataset> {
        let candidates = candidate_files(self.request)?;
        debug!(
            results_dir = %self.request.results_dir().display(),
            candidates = candidates.len(),
            "Aggregating result files"
        );

        let mut filtered_out = 0usize;
        for candidate in &candidates {
            let requested = &self.request.revisions()[candidate.revision_index];
            let record = ResultRecord::load(&candidate.path, requested)?;
            match self.absorb(&record, candidate.revision_index) {
                RecordOutcome::Accepted { samples } => debug!(
                    file = %candidate.filename,
                    probe = %record.probe_name(),
                    samples,
                    "Record accepted"
                ),
                RecordOutcome::FilteredOut => {
                    filtered_out += 1;
                    debug!(
                        file = %candidate.filename,
                        probe = %record.probe_name(),
                        "Record filtered out"
                    );
                }
            }
        }

        let dataset = self.series.into_dataset();
        info!(
            files = candidates.len(),
            filtered_out,
            series = dataset.len(),
            "Aggregation complete"
        );
        Ok(dataset)
    }

    /// Fold one record into its revision's series.
    ///
    /// The series is created (and its label fixed) on the first record of a
    /// revision, even if that record is then filtered out.
    pub fn absorb(&mut self, record: &ResultRecord, revision_index: usize) -> RecordOutcome {
        let label_override = self.request.label_for(revision_index);
        let series = self
            .series
            .get_or_insert_with(record.revision_sha(), || match label_override {
                Some(label) => label.to_string(),
                None => record.derived_label(),
            });

        if !self.request.accepts_benchmark(record.probe_name()) {
            return RecordOutcome::FilteredOut;
        }

        series.push_samples(record.probe_name(), record.probe_values());
        RecordOutcome::Accepted {
            samples: record.probe_values().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REV_A: &str = "abc1234567890abcdef0123456789abcdef01234";
    const REV_B: &str = "bbb9876543210fedcba9876543210fedcba98765";

    fn record_json(sha: &str, probe: &str, values: &[f64]) -> String {
        serde_json::json!({
            "ITK_MANUAL_BUILD_INFO": {
                "GIT_CONFIG_SHA1": sha,
                "GIT_CONFIG_DATE": "2018-03-01 10:00:00 -0500",
                "GIT_LOCAL_MODIFICATIONS": ""
            },
            "SystemInformation": { "ITKVersion": "5.0.0" },
            "Probes": [ { "Name": probe, "Values": values } ]
        })
        .to_string()
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn request(dir: &TempDir, revisions: &[&str]) -> crate::request::AggregationRequestBuilder {
        AggregationRequest::builder()
            .results_dir(dir.path())
            .revisions(revisions.iter().copied())
    }

    #[test]
    fn test_single_file_single_series() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Read_abc1234567.json", &record_json(REV_A, "Read", &[1.0, 1.2]));

        let req = request(&dir, &["abc1234567"]).build().unwrap();
        let dataset = aggregate(&req).unwrap();

        assert_eq!(dataset.len(), 1);
        let series = &dataset.series()[0];
        assert_eq!(series.x(), &["Read", "Read"]);
        assert_eq!(series.y(), &[1.0, 1.2]);
        assert_eq!(series.revision().as_str(), REV_A);
        assert_eq!(series.label(), "5.0.0 2018-03-01 10:00:00 -0500 abc1234");
    }

    #[test]
    fn test_filter_excluding_all_probes_yields_empty_dataset() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Read_abc1234567.json", &record_json(REV_A, "Read", &[1.0, 1.2]));

        let req = request(&dir, &["abc1234567"]).benchmark("Write").build().unwrap();
        let dataset = aggregate(&req).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_labels_and_revision_isolation() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Read_abc1234567890.json", &record_json(REV_A, "Read", &[1.0]));
        write(&dir, "Write_bbb9876543210.json", &record_json(REV_B, "Write", &[2.0, 3.0]));

        let req = request(&dir, &[REV_A, REV_B])
            .labels(["Before", "After"])
            .build()
            .unwrap();
        let dataset = aggregate(&req).unwrap();

        assert_eq!(dataset.len(), 2);
        let before = dataset.get(&Revision::new(REV_A)).unwrap();
        let after = dataset.get(&Revision::new(REV_B)).unwrap();
        assert_eq!(before.label(), "Before");
        assert_eq!(before.x(), &["Read"]);
        assert_eq!(before.y(), &[1.0]);
        assert_eq!(after.label(), "After");
        assert_eq!(after.x(), &["Write", "Write"]);
        assert_eq!(after.y(), &[2.0, 3.0]);
    }

    #[test]
    fn test_malformed_candidate_aborts_aggregation() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0]));
        write(&dir, "b_abc1234567.json", "{ this is not json");

        let req = request(&dir, &[REV_A]).build().unwrap();
        let err = aggregate(&req).unwrap_err();
        match err {
            Error::MalformedRecord { path, content, .. } => {
                assert!(path.ends_with("b_abc1234567.json"));
                assert_eq!(content, "{ this is not json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_utf8_candidate_is_malformed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_abc1234567.json"), [0xff, 0xfe, 0x7b]).unwrap();

        let req = request(&dir, &[REV_A]).build().unwrap();
        let err = aggregate(&req).unwrap_err();
        assert!(err.is_malformed_record());
        assert!(err.to_string().contains("a_abc1234567.json"));
    }

    #[test]
    fn test_embedded_commit_must_match_file_revision() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_B, "Read", &[9.0]));

        let req = request(&dir, &[REV_A]).labels(["Before"]).build().unwrap();
        match aggregate(&req).unwrap_err() {
            Error::MalformedRecord { path, reason, .. } => {
                assert!(path.ends_with("a_abc1234567.json"));
                assert!(reason.contains(&REV_B[..10]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_non_candidate_is_never_opened() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0]));
        write(&dir, "other_ffffffffff.json", "garbage");

        let req = request(&dir, &[REV_A]).build().unwrap();
        assert_eq!(aggregate(&req).unwrap().len(), 1);
    }

    #[test]
    fn test_samples_follow_sorted_filename_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "c_abc1234567.json", &record_json(REV_A, "Read", &[5.0, 6.0]));
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0, 2.0]));
        write(&dir, "b_abc1234567.json", &record_json(REV_A, "Write", &[3.0, 4.0]));

        let req = request(&dir, &[REV_A]).build().unwrap();
        let dataset = aggregate(&req).unwrap();
        let series = &dataset.series()[0];
        assert_eq!(series.y(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(series.x(), &["Read", "Read", "Write", "Write", "Read", "Read"]);
    }

    #[test]
    fn test_filter_skips_only_unlisted_probes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0]));
        write(&dir, "b_abc1234567.json", &record_json(REV_A, "Write", &[2.0]));

        let req = request(&dir, &[REV_A]).benchmark("Write").build().unwrap();
        let dataset = aggregate(&req).unwrap();
        let series = &dataset.series()[0];
        assert_eq!(series.x(), &["Write"]);
        assert_eq!(series.y(), &[2.0]);
    }

    #[test]
    fn test_series_in_first_encounter_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_bbb9876543.json", &record_json(REV_B, "Read", &[1.0]));
        write(&dir, "b_abc1234567.json", &record_json(REV_A, "Read", &[2.0]));

        let req = request(&dir, &[REV_A, REV_B]).build().unwrap();
        let dataset = aggregate(&req).unwrap();
        let order: Vec<&str> = dataset.iter().map(|s| s.revision().as_str()).collect();
        assert_eq!(order, vec![REV_B, REV_A]);
    }

    #[test]
    fn test_unmatched_revision_has_no_series() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0]));

        let req = request(&dir, &[REV_A, "0000000000ffff"]).build().unwrap();
        let dataset = aggregate(&req).unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.get(&Revision::new("0000000000ffff")).is_none());
    }

    #[test]
    fn test_label_fixed_by_first_file_even_if_filtered() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Write", &[1.0]));
        write(&dir, "b_abc1234567.json", &record_json(REV_A, "Read", &[2.0]));

        let req = request(&dir, &[REV_A])
            .labels(["Baseline"])
            .benchmark("Read")
            .build()
            .unwrap();
        let dataset = aggregate(&req).unwrap();
        assert_eq!(dataset.series()[0].label(), "Baseline");
        assert_eq!(dataset.series()[0].y(), &[2.0]);
    }

    #[test]
    fn test_subdirectories_are_not_candidates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested_abc1234567")).unwrap();

        let req = request(&dir, &[REV_A]).build().unwrap();
        assert!(candidate_files(&req).unwrap().is_empty());
    }

    #[test]
    fn test_missing_results_dir_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let req = AggregationRequest::builder()
            .results_dir(dir.path().join("missing"))
            .revision(REV_A)
            .build()
            .unwrap();
        assert!(matches!(aggregate(&req), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0, 2.0]));
        write(&dir, "b_bbb9876543.json", &record_json(REV_B, "Read", &[3.0]));

        let req = request(&dir, &[REV_A, REV_B]).build().unwrap();
        assert_eq!(aggregate(&req).unwrap(), aggregate(&req).unwrap());
    }

    #[test]
    fn test_every_series_has_parallel_arrays() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a_abc1234567.json", &record_json(REV_A, "Read", &[1.0, 2.0, 3.0]));
        write(&dir, "b_abc1234567.json", &record_json(REV_A, "Write", &[]));
        write(&dir, "c_bbb9876543.json", &record_json(REV_B, "Read", &[4.0]));

        let req = request(&dir, &[REV_A, REV_B]).build().unwrap();
        for series in &aggregate(&req).unwrap() {
            assert_eq!(series.x().len(), series.y().len());
        }
    }
}
