//! # prism-logs-core
//!
//! The retrieval core for prism-logs - THE LOGIC.
//!
//! Pulls time-windowed records out of the Prism Central v3 API by offset
//! pagination and aggregates them into a single ordered collection. This
//! crate owns everything that is decided rather than plumbed:
//!
//! - how a time window becomes a range filter (`window`)
//! - which query shape serves which record kind (`strategy`)
//! - how pages are sized and advanced (`plan`, `request`)
//! - how responses are read (`response`)
//! - how pages are accumulated (`aggregator`)
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network. The HTTP session lives in `apps/prism-logs`.
//! - Entities are opaque JSON and pass through untouched.

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregator;
pub mod plan;
pub mod request;
pub mod response;
pub mod strategy;
pub mod types;
pub mod window;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use aggregator::{ResultSet, RetrievalError};
pub use plan::{FLAT_PAGE_LENGTH, GROUP_PAGE_LENGTH, PROBE_LENGTH, PagePlan};
pub use request::{
    EVENT_MEMBER_ATTRIBUTES, GroupPageRequest, MemberAttribute, PageRequest, SortOrder, query_name,
};
pub use response::{GroupPage, GroupResponse, GroupResult, ListMetadata, ListPage, ListResponse};
pub use strategy::RetrievalStrategy;
pub use types::{Entity, PrismError, RecordKind};
pub use window::{TimeWindow, to_filter};
