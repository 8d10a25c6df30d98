//! Grouped `groups` pagination (events).
//!
//! The query asks for a single group and pages through its members 999 at a
//! time. The server wants `group_offset` and `group_member_offset` moved
//! together, so both are set to the same cursor on every page.

use super::{PageTransport, page_through};
use chrono::{DateTime, Utc};
use prism_logs_core::{
    GroupPage, GroupPageRequest, GroupResponse, PagePlan, RecordKind, ResultSet, RetrievalError,
    RetrievalStrategy, TimeWindow,
};

/// Retrieval through the grouped aggregation query.
#[derive(Debug, Clone)]
pub struct GroupedRetrieval {
    strategy: RetrievalStrategy,
    window: TimeWindow,
    issued_at: DateTime<Utc>,
}

impl GroupedRetrieval {
    #[must_use]
    pub fn new(strategy: RetrievalStrategy, window: TimeWindow, issued_at: DateTime<Utc>) -> Self {
        Self {
            strategy,
            window,
            issued_at,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.strategy.kind()
    }

    pub async fn run<P: PageTransport>(&self, transport: &P) -> Result<ResultSet, RetrievalError> {
        let request = GroupPageRequest::new(
            self.strategy.kind(),
            self.strategy.sort_attribute(),
            &self.window,
            self.issued_at,
        );
        tracing::debug!(kind = %self.kind(), query_name = %request.query_name, "Grouped query");

        page_through(
            transport,
            self.strategy.kind(),
            &self.strategy.path(),
            request,
            |body| {
                let first = GroupResponse::from_value(body)?;
                Ok(PagePlan::grouped(first.filtered_entity_count))
            },
            |body, cursor| GroupPage::from_value(body)?.into_first_group_entities(cursor),
        )
        .await
    }
}
