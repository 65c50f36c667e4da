//! TTL Cache benchmark
//!
//! Runs the concurrent set/get workload against a fresh cache and prints the
//! timing report to stdout. Logs go to stderr.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{BenchConfig, Harness};

/// Main entry point for the benchmark harness.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build a harness owning its own cache
/// 4. Run the set phase, then the get phase
/// 5. Print the report in the configured format
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BenchConfig::from_env().context("failed to load benchmark configuration")?;
    info!(
        "Configuration loaded: connections={}, ttl={:?}, payload={} bytes, sweep_interval={:?}",
        config.connections,
        config.ttl,
        config.payload.len(),
        config.sweep_interval
    );

    let format = config.report_format;
    let harness = Harness::new(config);
    let report = harness.run().await.context("benchmark run failed")?;

    println!("{}", report.render(format)?);

    info!("Benchmark complete");
    Ok(())
}
