//! s3migrate — copy missing objects from one bucket to another.
//!
//! Two-phase run: build the set of keys the target already holds, then
//! walk the source listing page by page, copying everything missing.
//! Re-running after a partial failure is the recovery path; the
//! skip-if-exists check makes the run idempotent.

use clap::Parser;
use tracing::{info, warn};

use s3migrate::config::{self, LoggingConfig};
use s3migrate::store::StoreClient;
use s3migrate::sync;

/// Command-line arguments for s3migrate.
#[derive(Parser, Debug)]
#[command(
    name = "s3migrate",
    version,
    about = "Bucket-to-bucket object migration for S3-compatible stores"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "s3migrate.example.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(&cli.config)?;
    init_tracing(&config.logging);
    info!("Loaded configuration from {}", cli.config);

    let source = StoreClient::new(&config.source).await?;
    let target = StoreClient::new(&config.target).await?;
    info!(
        "source: bucket={} endpoint={}",
        config.source.bucket, config.source.endpoint
    );
    info!(
        "target: bucket={} endpoint={}",
        config.target.bucket, config.target.endpoint
    );

    // Phase one: snapshot the target's keys for skip detection.
    let existing = sync::build_key_set(&target).await?;

    // Phase two: drain the source listing, copying what is missing.
    let report = sync::run(&source, &target, &existing).await?;

    if report.failed > 0 {
        warn!(
            "{} objects failed this run; re-run to attempt them again",
            report.failed
        );
    }
    info!("Done copying objects");

    Ok(())
}

/// Initialize tracing / logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(cfg: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.level.clone()));

    if cfg.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
