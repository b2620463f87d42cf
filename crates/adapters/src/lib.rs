// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! External tool, upload and rendering adapters for ITK performance runs.
//!
//! Everything that leaves the process lives here: git, CMake, Ninja and
//! CTest invocations, the Girder REST API, chart files and settings sources.
//! Result aggregation itself is in `itk-perf-benchmarks`.

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod upstream;
