// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plotly chart renderer.
//!
//! Renders a comparison dataset as a grouped box plot: one box trace per
//! revision, benchmarks along the x axis. The output is a standalone HTML
//! page that loads Plotly from `plotly_src`.

use itk_perf_benchmarks::ComparisonDataset;
use maud::{html, PreEscaped, DOCTYPE};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Plotly bundle loaded by the generated page.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Errors that can occur while rendering a chart.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing the chart failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding traces failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Box-plot renderer.
#[derive(Debug, Clone)]
pub struct PlotlyRenderer {
    /// Chart title.
    pub title: String,
    /// Y axis title.
    pub y_axis_title: String,
    /// URL of the Plotly script.
    pub plotly_src: String,
}

impl Default for PlotlyRenderer {
    fn default() -> Self {
        Self {
            title: "ITK Performance Benchmarks".to_string(),
            y_axis_title: "Time (s)".to_string(),
            plotly_src: PLOTLY_CDN.to_string(),
        }
    }
}

impl PlotlyRenderer {
    /// Renderer with a custom title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// One box trace per series.
    pub fn traces(&self, dataset: &ComparisonDataset) -> Vec<Value> {
        dataset
            .iter()
            .map(|series| {
                json!({
                    "type": "box",
                    "name": series.label(),
                    "x": series.x(),
                    "y": series.y(),
                })
            })
            .collect()
    }

    /// Layout grouping the boxes of each benchmark.
    pub fn layout(&self) -> Value {
        json!({
            "title": { "text": self.title },
            "boxmode": "group",
            "xaxis": { "title": { "text": "Benchmark" } },
            "yaxis": { "title": { "text": self.y_axis_title }, "rangemode": "tozero" },
        })
    }

    /// The complete HTML page.
    pub fn render_html(&self, dataset: &ComparisonDataset) -> Result<String> {
        let traces = script_safe(&serde_json::to_string(&self.traces(dataset))?);
        let layout = script_safe(&serde_json::to_string(&self.layout())?);
        let page = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    title { (self.title) }
                    script src=(self.plotly_src) {}
                }
                body {
                    div id="chart" style="width:100%;height:90vh;" {}
                    script {
                        (PreEscaped(format!(r#"Plotly.newPlot("chart", {}, {});"#, traces, layout)))
                    }
                }
            }
        };
        Ok(page.into_string())
    }

    /// Render and write the page to `path`, creating parent directories.
    pub fn write(&self, dataset: &ComparisonDataset, path: &Path) -> Result<()> {
        let html = self.render_html(dataset)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, html).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), series = dataset.len(), "Chart written");
        Ok(())
    }
}

/// JSON embedded in a `<script>` element must not close it.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use itk_perf_benchmarks::{aggregate, AggregationRequest};
    use tempfile::TempDir;

    fn dataset(dir: &TempDir) -> ComparisonDataset {
        let record = json!({
            "ITK_MANUAL_BUILD_INFO": { "GIT_CONFIG_SHA1": "abc1234567ff", "GIT_CONFIG_DATE": "2018" },
            "SystemInformation": { "ITKVersion": "5.0.0" },
            "Probes": [ { "Name": "Median</script>", "Values": [1.0, 2.0] } ]
        });
        fs::write(dir.path().join("Median_abc1234567.json"), record.to_string()).unwrap();
        let request = AggregationRequest::builder()
            .results_dir(dir.path())
            .revision("abc1234567")
            .labels(["Before"])
            .build()
            .unwrap();
        aggregate(&request).unwrap()
    }

    #[test]
    fn test_one_box_trace_per_series() {
        let dir = TempDir::new().unwrap();
        let traces = PlotlyRenderer::default().traces(&dataset(&dir));
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0]["type"], "box");
        assert_eq!(traces[0]["name"], "Before");
        assert_eq!(traces[0]["y"], json!([1.0, 2.0]));
    }

    #[test]
    fn test_layout_groups_boxes() {
        let layout = PlotlyRenderer::with_title("Nightly").layout();
        assert_eq!(layout["boxmode"], "group");
        assert_eq!(layout["title"]["text"], "Nightly");
    }

    #[test]
    fn test_html_escapes_script_terminators() {
        let dir = TempDir::new().unwrap();
        let html = PlotlyRenderer::with_title("<b>")
            .render_html(&dataset(&dir))
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>&lt;b&gt;</title>"));
        assert!(html.contains("Median<\\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("charts").join("compare.html");
        PlotlyRenderer::default()
            .write(&dataset(&dir), &path)
            .unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Plotly.newPlot"));
    }
}
