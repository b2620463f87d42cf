//! ITK performance benchmarking CLI entry point.

#[tokio::main]
async fn main() {
    if let Err(e) = itk_perf_cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
