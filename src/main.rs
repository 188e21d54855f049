//! Dealership Review Service
//!
//! A thin backend for a car-dealership review site built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │               DEALERSHIP REVIEWS                  │
//!                  │                                                   │
//!   Browser        │  ┌─────────┐    ┌──────────┐    ┌──────────────┐  │
//!   ───────────────┼─▶│  http   │───▶│ handlers │───▶│   upstream   │──┼──▶ Dealer/review
//!                  │  │ server  │    │          │    │    client    │  │    backend
//!                  │  └─────────┘    └────┬─────┘    └──────┬───────┘  │
//!                  │                      │                 │          │
//!                  │                      ▼                 ▼          │
//!                  │               ┌─────────────┐   ┌────────────┐    │
//!                  │               │ auth/catalog│   │ sentiment  │────┼──▶ Sentiment
//!                  │               │   stores    │   │ enrichment │    │    analyzer
//!                  │               └─────────────┘   └────────────┘    │
//!                  │                                                   │
//!                  │  config · observability · lifecycle               │
//!                  └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use dealer_reviews::config;
use dealer_reviews::lifecycle::startup;
use dealer_reviews::observability::logging;

#[derive(Parser)]
#[command(name = "dealer-reviews")]
#[command(about = "Car dealership review service", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("dealer-reviews v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_url = %config.upstream.backend_url,
        sentiment_analyzer_url = %config.upstream.sentiment_analyzer_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
