//! # prism-logs
//!
//! Pull audits, tasks, alerts and events out of Prism Central.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  apps/prism-logs (THE BINARY)                │
//! │                                                              │
//! │  ┌─────────────┐    ┌──────────────┐    ┌────────────────┐   │
//! │  │   CLI       │───▶│  Retriever   │───▶│    Session     │───┼──▶ Prism Central
//! │  │  (clap)     │    │ flat/grouped │    │   (reqwest)    │   │
//! │  └─────────────┘    └──────┬───────┘    └────────────────┘   │
//! │                            ▼                                 │
//! │                    ┌─────────────────┐                       │
//! │                    │ prism-logs-core │                       │
//! │                    │  (THE LOGIC)    │                       │
//! │                    └─────────────────┘                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! prism-logs --prism 10.0.0.5 -u admin -p '***' audits
//! prism-logs --pc pc.lab --logs-tz Europe/Paris -s 2024-01-01T00:00:00 -e 2024-01-02T00:00:00 events -o events.json
//! PRISM_PASSWORD='***' prism-logs -c prism.toml tasks
//! ```

use clap::Parser;
use prism_logs::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    init_tracing(cli.debug);

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        if e.is_rejection() {
            tracing::error!("Check the username and password for Prism Central");
        }
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr.
///
/// `PRISM_LOGS_LOG_FORMAT=json` enables machine-parseable output; `RUST_LOG`
/// overrides the level chosen by `--debug`.
fn init_tracing(debug: bool) {
    let log_format =
        std::env::var("PRISM_LOGS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if debug {
        "prism_logs=debug,prism_logs_core=debug"
    } else {
        "prism_logs=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
