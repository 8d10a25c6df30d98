//! # Retrieval Strategy
//!
//! Maps each record kind to the query shape that retrieves it.
//!
//! Audits, tasks and alerts are plain `<kind>s/list` listings. Events are
//! only exposed through the `groups` aggregation endpoint, which nests the
//! records one level inside a group.

use crate::RecordKind;

/// Sort/filter attribute for audits.
pub const AUDIT_TIME_ATTRIBUTE: &str = "op_start_timestamp_usecs";

/// Sort/filter attribute for tasks.
pub const TASK_TIME_ATTRIBUTE: &str = "creation_time_usecs";

/// Sort/filter attribute for alerts and events.
pub const CREATED_TIME_ATTRIBUTE: &str = "_created_timestamp_usecs_";

/// How a record kind is paged out of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    /// `POST <kind>s/list` with offset/length paging.
    Flat {
        kind: RecordKind,
        sort_attribute: &'static str,
    },
    /// `POST groups` with lock-stepped group/member offsets.
    Grouped {
        kind: RecordKind,
        sort_attribute: &'static str,
    },
}

impl RetrievalStrategy {
    /// Record kind this strategy retrieves.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Flat { kind, .. } | Self::Grouped { kind, .. } => *kind,
        }
    }

    /// Timestamp attribute used for both sorting and the window filter.
    #[must_use]
    pub const fn sort_attribute(&self) -> &'static str {
        match self {
            Self::Flat { sort_attribute, .. } | Self::Grouped { sort_attribute, .. } => {
                *sort_attribute
            }
        }
    }

    /// Endpoint path relative to the API base.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Flat { kind, .. } => format!("{kind}s/list"),
            Self::Grouped { .. } => "groups".to_string(),
        }
    }
}

impl RecordKind {
    /// The query shape used to retrieve this kind.
    #[must_use]
    pub const fn strategy(self) -> RetrievalStrategy {
        match self {
            Self::Audit => RetrievalStrategy::Flat {
                kind: self,
                sort_attribute: AUDIT_TIME_ATTRIBUTE,
            },
            Self::Task => RetrievalStrategy::Flat {
                kind: self,
                sort_attribute: TASK_TIME_ATTRIBUTE,
            },
            Self::Alert => RetrievalStrategy::Flat {
                kind: self,
                sort_attribute: CREATED_TIME_ATTRIBUTE,
            },
            Self::Event => RetrievalStrategy::Grouped {
                kind: self,
                sort_attribute: CREATED_TIME_ATTRIBUTE,
            },
        }
    }
}
