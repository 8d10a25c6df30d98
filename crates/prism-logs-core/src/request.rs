//! # Request Bodies
//!
//! The two listing payloads sent to Prism Central. Both are created once per
//! retrieval and then advanced in place; the filter never changes after
//! construction.

use crate::plan::{FLAT_PAGE_LENGTH, GROUP_PAGE_LENGTH, PROBE_LENGTH};
use crate::{RecordKind, TimeWindow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Member attributes projected by the events query.
pub const EVENT_MEMBER_ATTRIBUTES: [&str; 12] = [
    "title",
    "source_entity_name",
    "classification",
    "cluster",
    "_created_timestamp_usecs_",
    "default_message",
    "param_name_list",
    "param_value_list",
    "source_entity_uuid",
    "source_entity_type",
    "operation_type",
    "info",
];

// =============================================================================
// SORT ORDER
// =============================================================================

/// Sort direction on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Newest first. Every query this tool issues uses it.
    #[default]
    Descending,
}

// =============================================================================
// FLAT LISTING
// =============================================================================

/// Body of `POST <kind>s/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub kind: String,
    pub length: u64,
    pub offset: u64,
    pub sort_order: SortOrder,
    pub sort_attribute: String,
    pub filter: String,
}

impl PageRequest {
    /// First request of a retrieval: offset 0, a short page of
    /// [`PROBE_LENGTH`], descending by `sort_attribute` and filtered to the window.
    #[must_use]
    pub fn probe(kind: RecordKind, sort_attribute: &str, window: &TimeWindow) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            length: PROBE_LENGTH,
            offset: 0,
            sort_order: SortOrder::Descending,
            sort_attribute: sort_attribute.to_string(),
            filter: window.to_filter(sort_attribute),
        }
    }

    /// Move to the page at `cursor`, using the full page length.
    pub fn advance_to(&mut self, cursor: u64) {
        self.offset = cursor;
        self.length = FLAT_PAGE_LENGTH;
    }
}

// =============================================================================
// GROUPED LISTING
// =============================================================================

/// One entry of `group_member_attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAttribute {
    pub attribute: String,
}

/// Body of `POST groups`.
///
/// The group and member offsets are private and only move together through
/// [`GroupPageRequest::advance_to`]; the server expects them equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPageRequest {
    pub entity_type: String,
    pub query_name: String,
    pub group_count: u64,
    group_offset: u64,
    pub filter_criteria: String,
    pub group_attributes: Vec<MemberAttribute>,
    pub group_member_sort_attribute: String,
    pub group_member_sort_order: SortOrder,
    pub group_member_count: u64,
    group_member_offset: u64,
    pub group_member_attributes: Vec<MemberAttribute>,
}

impl GroupPageRequest {
    /// Single-group query over `kind`, projecting [`EVENT_MEMBER_ATTRIBUTES`].
    ///
    /// `issued_at` names the query (`eb:data-<unix seconds>`).
    #[must_use]
    pub fn new(
        kind: RecordKind,
        sort_attribute: &str,
        window: &TimeWindow,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_type: kind.as_str().to_string(),
            query_name: query_name(issued_at),
            group_count: 1,
            group_offset: 0,
            filter_criteria: window.to_filter(sort_attribute),
            group_attributes: Vec::new(),
            group_member_sort_attribute: sort_attribute.to_string(),
            group_member_sort_order: SortOrder::Descending,
            group_member_count: GROUP_PAGE_LENGTH,
            group_member_offset: 0,
            group_member_attributes: EVENT_MEMBER_ATTRIBUTES
                .iter()
                .map(|name| MemberAttribute {
                    attribute: (*name).to_string(),
                })
                .collect(),
        }
    }

    /// Move both offsets to `cursor`.
    pub fn advance_to(&mut self, cursor: u64) {
        self.group_offset = cursor;
        self.group_member_offset = cursor;
    }

    #[must_use]
    pub fn group_offset(&self) -> u64 {
        self.group_offset
    }

    #[must_use]
    pub fn group_member_offset(&self) -> u64 {
        self.group_member_offset
    }
}

/// Server-side identifier for a grouped query.
#[must_use]
pub fn query_name(issued_at: DateTime<Utc>) -> String {
    format!("eb:data-{}", issued_at.timestamp())
}
