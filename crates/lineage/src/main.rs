//! Lineage CLI binary.

use anyhow::Result;
use lineage::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the lineage CLI.
///
/// Uses tokio's current_thread runtime; a CLI invocation loads one cache and
/// runs one query.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=lineage=debug,lineage_cache=trace
    // Diagnostics go to stderr so `--json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lineage=info,lineage_cache=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting lineage CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Lineage CLI completed successfully");
    Ok(())
}
