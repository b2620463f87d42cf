// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for the ITK performance benchmarking workflow.
//!
//! This crate holds the vocabulary shared by the aggregator, the workflow
//! adapters and the CLI:
//!
//! - [`revision`] - Source revision identifiers and their short forms
//! - [`record`] - Parsed benchmark result records
//! - [`build_info`] - Build metadata handed to a benchmark run
//! - [`error`] - The error taxonomy

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod build_info;
pub mod error;
pub mod record;
pub mod revision;

pub use build_info::BuildInformation;
pub use error::{Error, Result};
pub use record::ResultRecord;
pub use revision::Revision;
