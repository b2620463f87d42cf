//! Benchmark result aggregation for ITK performance runs.
//!
//! This crate turns a directory of benchmark result files into a
//! comparison-ready dataset: one series of `(benchmark, sample)` pairs per
//! source revision.
//!
//! # Quick Start
//!
//! ```no_run
//! use itk_perf_benchmarks::{aggregate, AggregationRequest};
//!
//! let request = AggregationRequest::builder()
//!     .results_dir("results/buildhost")
//!     .revisions(["fca883daf05ac62ee04", "1a2b3c4d5e6f7a8b9c0d"])
//!     .labels(["Before", "After"])
//!     .build()?;
//!
//! let dataset = aggregate(&request)?;
//! for series in &dataset {
//!     println!("{}: {} samples", series.label(), series.len());
//! }
//! # Ok::<(), itk_perf_core::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`mod@aggregate`] - The aggregation pass
//! - [`request`] - Aggregation parameters
//! - [`dataset`] - `Series` and `ComparisonDataset`
//! - [`io`] - Result store layout and dataset persistence
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod dataset;
pub mod io;
pub mod markdown;
pub mod request;

pub use aggregate::{aggregate, RecordOutcome};
pub use dataset::{ComparisonDataset, ProbeStats, Series};
pub use request::{AggregationRequest, AggregationRequestBuilder};
