//! Markdown output generation for comparison datasets.
//!
//! This module renders a per-revision statistics report that accompanies
//! the comparison chart.

use crate::dataset::ComparisonDataset;
use std::fmt::Write;

/// Generate a markdown summary from a comparison dataset.
pub fn generate_summary(dataset: &ComparisonDataset) -> String {
    let mut output = String::new();

    writeln!(output, "# Revision Comparison Summary").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();

    if dataset.is_empty() {
        writeln!(output, "No samples matched the requested revisions.").unwrap();
        return output;
    }

    for series in dataset {
        writeln!(output, "## {}", series.label()).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Revision: `{}`", series.revision()).unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Benchmark | Samples | Min (s) | Median (s) | Mean (s) | Max (s) | Std (s) |"
        )
        .unwrap();
        writeln!(
            output,
            "|-----------|---------|---------|------------|----------|---------|---------|"
        )
        .unwrap();

        for name in series.probe_names() {
            let Some(stats) = series.probe_stats(name) else {
                continue;
            };
            writeln!(
                output,
                "| {} | {} | {:.6} | {:.6} | {:.6} | {:.6} | {:.6} |",
                name, stats.count, stats.min, stats.median, stats.mean, stats.max, stats.std_dev
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "---").unwrap();
    writeln!(output, "Total revisions: {}", dataset.len()).unwrap();

    output
}
