//! # Configuration
//!
//! Resolves everything the retrieval needs before the first request goes
//! out: the connection, the time window and the output path.
//!
//! ## Sources (highest precedence first)
//!
//! 1. Command line flags
//! 2. Environment: `PRISM_HOST`, `PRISM_USERNAME`, `PRISM_PASSWORD`
//! 3. TOML file given by `--config` or `PRISM_LOGS_CONFIG`
//! 4. Built-in defaults (port 9440, UTC, last hour, `logs-<usecs>.json`)
//!
//! ```toml
//! [prism]
//! host = "pc.example.com"
//! port = 9440
//! username = "admin"
//! password = "..."
//! verify = false
//!
//! [logs]
//! timezone = "Europe/Amsterdam"
//! output = "audits.json"
//! ```

use crate::session::{Connection, DEFAULT_PORT};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use prism_logs_core::{PrismError, TimeWindow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Accepted format for `--start` / `--end`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PRISM_LOGS_CONFIG";

/// Length of the default window ending now.
const DEFAULT_LOOKBACK_HOURS: i64 = 1;

// =============================================================================
// FILE CONFIG
// =============================================================================

/// `[prism]` table.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrismSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub verify: Option<bool>,
}

/// `[logs]` table.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogsSection {
    pub timezone: Option<String>,
    pub output: Option<PathBuf>,
}

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub prism: PrismSection,
    #[serde(default)]
    pub logs: LogsSection,
}

impl FileConfig {
    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, PrismError> {
        toml::from_str(text).map_err(|e| PrismError::Config(format!("Invalid config file: {e}")))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, PrismError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PrismError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }
}

// =============================================================================
// OVERRIDES
// =============================================================================

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub verify: Option<bool>,
    pub timezone: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub output: Option<PathBuf>,
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

/// Validated inputs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: Connection,
    pub timezone: Tz,
    pub window: TimeWindow,
    pub output: PathBuf,
}

impl Settings {
    /// Resolve settings against the process environment and the clock.
    pub fn from_env(overrides: &Overrides, config: Option<&Path>) -> Result<Self, PrismError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let path = config
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));
        let file = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                FileConfig::load(&path)?
            }
            None => FileConfig::default(),
        };

        Self::resolve(overrides, env, &file, Utc::now())
    }

    /// Merge all sources. `env` looks up environment variables and `now`
    /// anchors the default window and output name.
    pub fn resolve(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
        file: &FileConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, PrismError> {
        let host = pick(overrides.host.clone(), env("PRISM_HOST"), file.prism.host.clone())
            .ok_or_else(|| missing("Prism Central host", "--prism", "PRISM_HOST"))?;
        let username = pick(
            overrides.username.clone(),
            env("PRISM_USERNAME"),
            file.prism.username.clone(),
        )
        .ok_or_else(|| missing("username", "--username", "PRISM_USERNAME"))?;
        let password = pick(
            overrides.password.clone(),
            env("PRISM_PASSWORD"),
            file.prism.password.clone(),
        )
        .ok_or_else(|| missing("password", "--password", "PRISM_PASSWORD"))?;

        let connection = Connection {
            host,
            port: overrides.port.or(file.prism.port).unwrap_or(DEFAULT_PORT),
            username,
            password,
            verify_tls: overrides.verify.or(file.prism.verify).unwrap_or(false),
        };

        let timezone = parse_timezone(
            overrides
                .timezone
                .as_deref()
                .or(file.logs.timezone.as_deref())
                .unwrap_or("UTC"),
        )?;

        let window = resolve_window(
            overrides.start.as_deref(),
            overrides.end.as_deref(),
            timezone,
            now,
        )?;

        let output = overrides
            .output
            .clone()
            .or_else(|| file.logs.output.clone())
            .unwrap_or_else(|| default_output(now));

        Ok(Self {
            connection,
            timezone,
            window,
            output,
        })
    }
}

fn pick(cli: Option<String>, env: Option<String>, file: Option<String>) -> Option<String> {
    cli.or(env).or(file).filter(|v| !v.is_empty())
}

fn missing(what: &str, flag: &str, var: &str) -> PrismError {
    PrismError::Config(format!("No {what} given; use {flag} or set {var}"))
}

// =============================================================================
// TIME
// =============================================================================

/// Parse an IANA timezone name such as `UTC` or `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz, PrismError> {
    name.parse::<Tz>()
        .map_err(|_| PrismError::InvalidTime(format!("Unknown timezone '{name}'")))
}

/// Parse `YYYY-MM-DDTHH:MM:SS` as wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times
/// that do not exist (DST spring-forward) are rejected.
pub fn parse_local(value: &str, tz: Tz) -> Result<DateTime<Tz>, PrismError> {
    let naive = NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        PrismError::InvalidTime(format!("'{value}' does not match YYYY-MM-DDTHH:MM:SS"))
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| PrismError::InvalidTime(format!("'{value}' does not exist in {tz}")))
}

/// Build the window from optional bounds. Missing end is `now`, missing
/// start is one hour before `now`.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<TimeWindow, PrismError> {
    let now = now.with_timezone(&tz);

    let start = match start {
        Some(value) => parse_local(value, tz)?,
        None => {
            let start = now - Duration::hours(DEFAULT_LOOKBACK_HOURS);
            tracing::info!(start = %start, "No start time defined, taking default 1 hour back");
            start
        }
    };
    let end = match end {
        Some(value) => parse_local(value, tz)?,
        None => {
            tracing::info!(end = %now, "No end time defined, taking default now");
            now
        }
    };

    if start > end {
        return Err(PrismError::InvalidWindow(format!(
            "start {start} is after end {end}"
        )));
    }

    Ok(TimeWindow::new(start, end))
}

/// `logs-<now in microseconds>.json`
#[must_use]
pub fn default_output(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("logs-{}.json", now.timestamp_micros()))
}
