//! # prism-logs CLI Module
//!
//! This module implements the CLI interface for prism-logs.
//!
//! ## Available Commands
//!
//! - `audits` - Audit trail entries, by `op_start_timestamp_usecs`
//! - `tasks` - Tasks, by `creation_time_usecs`
//! - `alerts` - Alerts, by `_created_timestamp_usecs_`
//! - `events` - Events (grouped query), by `_created_timestamp_usecs_`

mod commands;

use crate::config::Overrides;
use clap::{ArgAction, Parser, Subcommand};
use prism_logs_core::{PrismError, RecordKind};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// prism-logs - pull logs out of Prism Central
///
/// Retrieves every audit, task, alert or event recorded in a time window
/// and writes them to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "prism-logs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Username for Prism Central
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Password for Prism Central
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Prism Central IP or FQDN
    #[arg(long, visible_alias = "pc", global = true)]
    pub prism: Option<String>,

    /// Prism Central port [default: 9440]
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Verify the server's TLS certificate (true/false) [default: false]
    #[arg(short, long, global = true, action = ArgAction::Set, value_name = "BOOL")]
    pub verify: Option<bool>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Timezone of --start and --end [default: UTC]
    #[arg(long = "logs-tz", visible_alias = "tz", global = true)]
    pub logs_tz: Option<String>,

    /// Start of the window, YYYY-MM-DDTHH:MM:SS [default: 1 hour ago]
    #[arg(short, long, global = true)]
    pub start: Option<String>,

    /// End of the window (exclusive), YYYY-MM-DDTHH:MM:SS [default: now]
    #[arg(short, long, global = true)]
    pub end: Option<String>,

    /// Output filename [default: logs-<usecs>.json]
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// TOML config file with [prism] and [logs] tables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// On a failed retrieval, still write what was collected
    #[arg(long, global = true)]
    pub keep_partial: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Get audits
    Audits,
    /// Get tasks
    Tasks,
    /// Get alerts
    Alerts,
    /// Get events
    Events,
}

impl Commands {
    /// Record kind this command retrieves.
    #[must_use]
    pub fn kind(self) -> RecordKind {
        match self {
            Self::Audits => RecordKind::Audit,
            Self::Tasks => RecordKind::Task,
            Self::Alerts => RecordKind::Alert,
            Self::Events => RecordKind::Event,
        }
    }
}

impl Cli {
    /// Command-line values, for merging with env and config file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.prism.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            verify: self.verify,
            timezone: self.logs_tz.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            output: self.output.clone(),
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), PrismError> {
    let settings = crate::config::Settings::from_env(&cli.overrides(), cli.config.as_deref())?;
    tracing::info!(timezone = %settings.timezone, "Timezone set to {}", settings.timezone);

    cmd_retrieve(cli.command.kind(), &settings, cli.keep_partial).await
}
