//! I/O operations for the result store and comparison datasets.
//!
//! Result files live under `<results_root>/<lowercased hostname>/`, one JSON
//! file per benchmark run.

use crate::dataset::ComparisonDataset;
use itk_perf_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the result files written by the benchmark executables.
pub const RESULT_EXTENSION: &str = "json";

/// Results directory of one host.
pub fn host_results_dir(results_root: impl AsRef<Path>, hostname: &str) -> PathBuf {
    results_root.as_ref().join(hostname.to_lowercase())
}

/// Regular files in `dir` with the given extension, sorted by file name.
pub fn list_result_files(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write a dataset as pretty-printed JSON, creating parent directories.
pub fn write_dataset_json(dataset: &ComparisonDataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

/// Read a dataset written by [`write_dataset_json`].
pub fn read_dataset_json(path: impl AsRef<Path>) -> Result<ComparisonDataset> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let dataset: ComparisonDataset = serde_json::from_str(&content)
        .map_err(|e| Error::malformed_record(path, content.as_str(), e))?;
    if let Some(series) = dataset.unbalanced_series() {
        let reason = format!(
            "series '{}' has {} names but {} values",
            series.label(),
            series.x().len(),
            series.y().len()
        );
        return Err(Error::malformed_record(path, content, reason));
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Series;
    use itk_perf_core::Revision;
    use tempfile::TempDir;

    #[test]
    fn test_host_results_dir_lowercases_hostname() {
        let dir = host_results_dir("/data/results", "Build-Host.Example");
        assert_eq!(dir, PathBuf::from("/data/results/build-host.example"));
    }

    #[test]
    fn test_list_result_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub.json")).unwrap();

        let files = list_result_files(dir.path(), RESULT_EXTENSION).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_dataset_json_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut series = Series::new(Revision::new("abc"), "Before");
        series.push_samples("Read", &[1.0, 2.0]);
        let dataset = ComparisonDataset::from_series(vec![series]);

        let path = dir.path().join("out/dataset.json");
        write_dataset_json(&dataset, &path).unwrap();
        assert_eq!(read_dataset_json(&path).unwrap(), dataset);
    }

    #[test]
    fn test_read_dataset_rejects_unbalanced_series() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.json");
        fs::write(
            &path,
            r#"[{"revision": "abc", "label": "l", "x": ["Read", "Read"], "y": [1.0]}]"#,
        )
        .unwrap();
        assert!(read_dataset_json(&path).unwrap_err().is_malformed_record());
    }
}
