//! CLI for ITK performance benchmarking.
//!
//! Drives the whole workflow: building the toolkit and running the benchmark
//! suite (`run`), publishing result files (`upload`) and comparing revisions
//! (`revisions`).

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use itk_perf_adapters::upstream::prelude::*;
use itk_perf_benchmarks::{aggregate, io, markdown, AggregationRequest};
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::System;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ITK performance benchmarking CLI.
#[derive(Parser, Debug)]
#[command(name = "itk-perf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: ./itk-perf.toml when present).
    #[arg(short, long, global = true, env = "ITK_PERF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build ITK, then build and run the benchmarks.
    Run {
        /// ITK source directory.
        src: PathBuf,
        /// ITK build directory.
        bin: PathBuf,
        /// ITK performance benchmarks source directory.
        benchmark_src: PathBuf,
        /// ITK performance benchmarks build directory.
        benchmark_bin: PathBuf,
        /// ITK git tag (default: toolkit.git_tag setting).
        #[arg(short, long)]
        git_tag: Option<String>,
    },

    /// Upload this host's result files to Girder.
    Upload {
        /// Directory holding the result files (default: this host's results).
        #[arg(long)]
        results_dir: Option<PathBuf>,
        /// Girder folder ID (default: girder.folder_id setting).
        #[arg(long)]
        folder_id: Option<String>,
    },

    /// Compare benchmark results across revisions.
    Revisions {
        /// Git revisions to compare, in plot order.
        #[arg(required = true)]
        revisions: Vec<String>,
        /// Directory holding the result files (default: this host's results).
        #[arg(long)]
        results_dir: Option<PathBuf>,
        /// Only include these benchmarks.
        #[arg(short, long, num_args = 1..)]
        benchmarks: Option<Vec<String>>,
        /// Display labels, one per revision.
        #[arg(short, long, num_args = 1..)]
        labels: Option<Vec<String>>,
        /// Chart output path.
        #[arg(short, long, default_value = "revisions.html")]
        output: PathBuf,
        /// Also write the dataset as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
        /// Print a markdown summary.
        #[arg(long)]
        summary: bool,
    },

    /// Show effective settings.
    Status,
}

/// Run the CLI with the process arguments.
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_tracing(&settings.log_level, cli.verbose);

    match cli.command {
        Commands::Run {
            src,
            bin,
            benchmark_src,
            benchmark_bin,
            git_tag,
        } => {
            let tag = git_tag.unwrap_or_else(|| settings.toolkit.git_tag.clone());
            // git, cmake, ninja and ctest block for the whole build.
            tokio::task::spawn_blocking(move || {
                run_workflow(&settings, &src, &bin, &benchmark_src, &benchmark_bin, &tag)
            })
            .await
            .context("Benchmark workflow task failed")?
        }
        Commands::Upload {
            results_dir,
            folder_id,
        } => {
            let dir = match results_dir {
                Some(dir) => dir,
                None => default_results_dir(&settings)?,
            };
            let folder_id = folder_id.unwrap_or_else(|| settings.girder.folder_id.clone());
            upload(&settings, &dir, &folder_id).await
        }
        Commands::Revisions {
            revisions,
            results_dir,
            benchmarks,
            labels,
            output,
            json,
            summary,
        } => {
            let dir = match results_dir {
                Some(dir) => dir,
                None => default_results_dir(&settings)?,
            };
            let mut builder = AggregationRequest::builder()
                .results_dir(dir)
                .revisions(revisions);
            if let Some(benchmarks) = benchmarks {
                builder = builder.benchmarks(benchmarks);
            }
            if let Some(labels) = labels {
                builder = builder.labels(labels);
            }
            compare_revisions(builder.build()?, &output, json.as_deref(), summary)
        }
        Commands::Status => status(&settings, cli.config.as_deref()),
    }
}

/// `RUST_LOG` wins; otherwise `log_level`, raised to `debug` by `--verbose`.
fn init_tracing(log_level: &str, verbose: bool) {
    let default = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn hostname() -> Result<String> {
    System::host_name().ok_or_else(|| anyhow!("Could not determine the host name"))
}

fn default_results_dir(settings: &Settings) -> Result<PathBuf> {
    Ok(io::host_results_dir(&settings.results_root, &hostname()?))
}

fn run_workflow(
    settings: &Settings,
    src: &Path,
    bin: &Path,
    benchmark_src: &Path,
    benchmark_bin: &Path,
    git_tag: &str,
) -> Result<()> {
    check_required_programs(&SystemCommandRunner)?;

    let git = GitAdapter::new(SystemCommandRunner);
    let cmake = CMakeAdapter::new(SystemCommandRunner);

    git.ensure_clone(&settings.toolkit.repository, src)?;
    git.checkout(src, git_tag)?;
    if git.ensure_clone(&settings.benchmarks.repository, benchmark_src)? {
        git.checkout(benchmark_src, &settings.benchmarks.git_tag)?;
    }

    let build_information = git.build_information(src)?;
    println!("ITK repository information:");
    println!("  SHA:   {}", build_information.git_sha);
    println!("  Date:  {}", build_information.git_date);
    if build_information.has_local_modifications() {
        println!("  Local: {}", build_information.local_modifications);
    }

    println!("\nBuilding ITK...");
    cmake.configure_toolkit(src, bin)?;
    cmake.build(bin)?;

    let has_build_information = git.has_build_information(src)?;
    let results_dir = absolute_dir(&default_results_dir(settings)?)?;

    println!("\nBuilding benchmarks...");
    cmake.configure_benchmarks(
        benchmark_src,
        benchmark_bin,
        bin,
        has_build_information,
        &results_dir,
    )?;
    cmake.build(benchmark_bin)?;

    println!("\nRunning benchmarks...");
    cmake.run_benchmarks(benchmark_bin, &build_information)?;

    println!("\nDone running performance benchmarks.");
    println!("Results written to {}", results_dir.display());
    Ok(())
}

/// Create `dir` and return its absolute form, so CMake does not resolve it
/// against the build tree.
fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::canonicalize(dir).with_context(|| format!("Failed to resolve {}", dir.display()))
}

async fn upload(settings: &Settings, dir: &Path, folder_id: &str) -> Result<()> {
    let credentials = Credentials::from_settings(&settings.girder)?;
    let mut client = GirderClient::new(&settings.girder.api_url)?;
    client.authenticate(&credentials).await?;

    let uploaded = client.upload_directory(folder_id, dir).await?;
    println!("Uploaded {} files to folder {}", uploaded.len(), folder_id);
    for file in &uploaded {
        println!("  - {} ({} bytes)", file.name, file.size);
    }
    Ok(())
}

fn compare_revisions(
    request: AggregationRequest,
    output: &Path,
    json: Option<&Path>,
    summary: bool,
) -> Result<()> {
    let dataset = aggregate(&request)?;
    if dataset.is_empty() {
        println!(
            "No results for the requested revisions in {}",
            request.results_dir().display()
        );
    }

    PlotlyRenderer::default().write(&dataset, output)?;
    println!("Chart written to {}", output.display());

    if let Some(path) = json {
        io::write_dataset_json(&dataset, path)?;
        info!(path = %path.display(), "Dataset written");
    }

    if summary {
        println!("\n{}", markdown::generate_summary(&dataset));
    }
    Ok(())
}

fn status(settings: &Settings, config: Option<&Path>) -> Result<()> {
    println!("ITK Performance Benchmarking");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    println!("\nSettings:");
    match config {
        Some(path) => println!("  File:          {}", path.display()),
        None => println!("  File:          itk-perf.toml (optional)"),
    }
    println!("  Results root:  {}", settings.results_root.display());
    println!("  Host results:  {}", default_results_dir(settings)?.display());
    println!(
        "  ITK:           {} @ {}",
        settings.toolkit.repository, settings.toolkit.git_tag
    );
    println!("  Benchmarks:    {}", settings.benchmarks.repository);
    println!("  Girder API:    {}", settings.girder.api_url);
    println!("  Girder folder: {}", settings.girder.folder_id);
    let credentials = match Credentials::from_settings(&settings.girder) {
        Ok(Credentials::ApiKey(_)) => "API key",
        Ok(Credentials::Password { .. }) => "username/password",
        Err(_) => "none",
    };
    println!("  Credentials:   {}", credentials);
    Ok(())
}
