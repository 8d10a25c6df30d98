//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the retrieval core:
//! - Opaque records (`Entity`)
//! - The record kinds the tool knows how to pull (`RecordKind`)
//! - Error types (`PrismError`)
//!
//! ## Opacity
//!
//! Entities are carried as raw JSON. Nothing in the core looks inside them,
//! so a server-side schema change never breaks retrieval.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ENTITY
// =============================================================================

/// One record returned by the remote API (audit, task, alert or event).
///
/// Passed through unmodified from response to output file.
pub type Entity = serde_json::Value;

// =============================================================================
// RECORD KIND
// =============================================================================

/// The kinds of records that can be pulled from Prism Central.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Audit trail entries (`audits/list`).
    Audit,
    /// Task entries (`tasks/list`).
    Task,
    /// Alert entries (`alerts/list`).
    Alert,
    /// Events, only reachable through the `groups` aggregation endpoint.
    Event,
}

impl RecordKind {
    /// All kinds, in CLI order.
    pub const ALL: [RecordKind; 4] = [Self::Audit, Self::Task, Self::Alert, Self::Event];

    /// Lowercase singular name as used on the wire (`audit`, `task`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Task => "task",
            Self::Alert => "alert",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while retrieving records.
///
/// - No silent failures
/// - Use `Result<T, PrismError>` for fallible operations
/// - Connectivity and rejection are separate variants so callers can tell
///   "could not reach the server" from "the server said no"
#[derive(Debug, Error)]
pub enum PrismError {
    /// DNS, TLS or refused connection. The request never got an answer.
    #[error("Cannot connect to {url}: {reason}")]
    Connectivity { url: String, reason: String },

    /// The server answered 401/403.
    #[error("Request to {url} rejected with HTTP {status}")]
    Rejected { url: String, status: u16 },

    /// The identity probe did not come back 200.
    #[error("Authentication failed for user {user} at {url}")]
    AuthenticationFailed { url: String, user: String },

    /// The server answered with some other non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body is missing expected fields or is not JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A grouped page reported matches but carried no group to read them from.
    #[error("Grouped response at offset {offset} has no group results")]
    EmptyGroupPage { offset: u64 },

    /// A time bound could not be parsed or a timezone is unknown.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// The window is unusable (start after end).
    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    /// Missing or contradictory settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// File system error.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl PrismError {
    /// True for transport-level failures (nothing was received).
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// True when the server refused the credentials.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::AuthenticationFailed { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
