//! Comparison dataset types.
//!
//! A [`ComparisonDataset`] is what the aggregator hands to a chart renderer:
//! one [`Series`] per revision, each holding parallel arrays of benchmark
//! names (`x`) and sample values (`y`).

use itk_perf_core::Revision;
use serde::{Deserialize, Serialize};

/// One revision's labeled collection of `(benchmark name, sample)` pairs.
///
/// `x` and `y` always have the same length: the only mutator pushes to both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    revision: Revision,
    label: String,
    x: Vec<String>,
    y: Vec<f64>,
}

impl Series {
    pub(crate) fn new(revision: Revision, label: impl Into<String>) -> Self {
        Self {
            revision,
            label: label.into(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// Append one pair per value, in order.
    pub(crate) fn push_samples(&mut self, probe_name: &str, values: &[f64]) {
        for &value in values {
            self.x.push(probe_name.to_string());
            self.y.push(value);
        }
    }

    /// Revision the samples were measured on.
    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    /// Display name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Benchmark name of every sample.
    pub fn x(&self) -> &[String] {
        &self.x
    }

    /// Sample values, parallel to [`Series::x`].
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Iterate over `(benchmark name, value)` pairs.
    pub fn samples(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.x.iter().map(String::as_str).zip(self.y.iter().copied())
    }

    /// Distinct benchmark names, in first-appearance order.
    pub fn probe_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in &self.x {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// All samples recorded for `probe_name`, in order.
    pub fn values_for(&self, probe_name: &str) -> Vec<f64> {
        self.samples()
            .filter(|(name, _)| *name == probe_name)
            .map(|(_, value)| value)
            .collect()
    }

    /// Summary statistics for `probe_name`, or `None` if it has no samples.
    pub fn probe_stats(&self, probe_name: &str) -> Option<ProbeStats> {
        ProbeStats::from_samples(&self.values_for(probe_name))
    }

    fn is_balanced(&self) -> bool {
        self.x.len() == self.y.len()
    }
}

/// Ordered collection of series, one per revision that contributed samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonDataset {
    series: Vec<Series>,
}

impl ComparisonDataset {
    pub(crate) fn from_series(series: Vec<Series>) -> Self {
        Self { series }
    }

    /// Series in first-encounter order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no revision contributed any sample.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series for `revision`, if present.
    pub fn get(&self, revision: &Revision) -> Option<&Series> {
        self.series.iter().find(|s| s.revision() == revision)
    }

    /// Iterate over the series.
    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    /// First series whose `x` and `y` lengths differ.
    ///
    /// Only datasets read back from disk can contain one.
    pub(crate) fn unbalanced_series(&self) -> Option<&Series> {
        self.series.iter().find(|s| !s.is_balanced())
    }
}

impl<'a> IntoIterator for &'a ComparisonDataset {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Descriptive statistics of one benchmark within one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeStats {
    /// Number of samples.
    pub count: usize,
    /// Smallest sample.
    pub min: f64,
    /// Median sample.
    pub median: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Largest sample.
    pub max: f64,
    /// Sample standard deviation (zero for a single sample).
    pub std_dev: f64,
}

impl ProbeStats {
    /// Compute statistics, or `None` for an empty slice.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        let std_dev = if count > 1 {
            let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            min: sorted[0],
            median,
            mean,
            max: sorted[count - 1],
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Series {
        let mut s = Series::new(Revision::new("abc"), "label");
        s.push_samples("Read", &[1.0, 3.0]);
        s.push_samples("Write", &[5.0]);
        s.push_samples("Read", &[2.0]);
        s
    }

    #[test]
    fn test_push_samples_keeps_arrays_parallel() {
        let s = series();
        assert_eq!(s.x().len(), s.y().len());
        assert_eq!(s.x(), &["Read", "Read", "Write", "Read"]);
        assert_eq!(s.y(), &[1.0, 3.0, 5.0, 2.0]);
    }

    #[test]
    fn test_probe_names_first_appearance_order() {
        assert_eq!(series().probe_names(), vec!["Read", "Write"]);
    }

    #[test]
    fn test_values_for_probe() {
        assert_eq!(series().values_for("Read"), vec![1.0, 3.0, 2.0]);
        assert!(series().values_for("Missing").is_empty());
    }

    #[test]
    fn test_probe_stats() {
        let stats = series().probe_stats("Read").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_probe_stats_single_sample() {
        let stats = ProbeStats::from_samples(&[4.0]).unwrap();
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.std_dev, 0.0);
        assert!(ProbeStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_detects_unbalanced_series() {
        let json = r#"[{"revision": "abc", "label": "l", "x": ["Read"], "y": []}]"#;
        let dataset: ComparisonDataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.unbalanced_series().map(Series::label), Some("l"));

        let balanced = ComparisonDataset::from_series(vec![series()]);
        assert!(balanced.unbalanced_series().is_none());
    }
}
