//! # Retrieval
//!
//! Drives paged queries through a [`PageTransport`] and aggregates the
//! results.
//!
//! - `flat` - `<kind>s/list` listings (audits, tasks, alerts)
//! - `grouped` - the `groups` aggregation query (events)
//!
//! Pages are fetched strictly one after another. The first failing page
//! aborts the retrieval and the records collected so far travel back inside
//! the [`RetrievalError`].

mod flat;
mod grouped;

pub use flat::FlatRetrieval;
pub use grouped::GroupedRetrieval;

use crate::session::Session;
use chrono::{DateTime, Utc};
use prism_logs_core::{
    Entity, GroupPageRequest, PagePlan, PageRequest, PrismError, RecordKind, ResultSet,
    RetrievalError, RetrievalStrategy, TimeWindow,
};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// TRANSPORT SEAM
// =============================================================================

/// Something that can POST a listing query and hand back the JSON body.
///
/// Implemented by [`Session`]; tests drive the engines with scripted
/// transports.
#[allow(async_fn_in_trait)]
pub trait PageTransport {
    /// POST `payload` to `path` relative to the API base.
    async fn post_page<T: Serialize + Sync>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Value, PrismError>;
}

impl PageTransport for Session {
    async fn post_page<T: Serialize + Sync>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Value, PrismError> {
        self.post(path, payload).await
    }
}

// =============================================================================
// RETRIEVER
// =============================================================================

/// One retrieval, flat or grouped, picked from the record kind.
#[derive(Debug, Clone)]
pub enum Retriever {
    Flat(FlatRetrieval),
    Grouped(GroupedRetrieval),
}

impl Retriever {
    /// Select the engine for `kind` over `window`.
    ///
    /// `issued_at` names grouped queries on the server.
    #[must_use]
    pub fn for_kind(kind: RecordKind, window: TimeWindow, issued_at: DateTime<Utc>) -> Self {
        let strategy = kind.strategy();
        match strategy {
            RetrievalStrategy::Flat { .. } => Self::Flat(FlatRetrieval::new(strategy, window)),
            RetrievalStrategy::Grouped { .. } => {
                Self::Grouped(GroupedRetrieval::new(strategy, window, issued_at))
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Flat(flat) => flat.kind(),
            Self::Grouped(grouped) => grouped.kind(),
        }
    }

    /// Fetch every page and return the aggregated records.
    pub async fn run<P: PageTransport>(&self, transport: &P) -> Result<ResultSet, RetrievalError> {
        match self {
            Self::Flat(flat) => flat.run(transport).await,
            Self::Grouped(grouped) => grouped.run(transport).await,
        }
    }
}

// =============================================================================
// PAGING LOOP
// =============================================================================

/// A request body that can be moved to a page cursor.
trait Cursor: Serialize + Sync {
    fn advance_to(&mut self, cursor: u64);
}

impl Cursor for PageRequest {
    fn advance_to(&mut self, cursor: u64) {
        PageRequest::advance_to(self, cursor);
    }
}

impl Cursor for GroupPageRequest {
    fn advance_to(&mut self, cursor: u64) {
        GroupPageRequest::advance_to(self, cursor);
    }
}

/// Send the first request, build the plan from its body with `plan`, then
/// fetch every page of that plan in order and read each with `page`.
///
/// The first body is only used for the plan. Its records are not collected.
async fn page_through<P, R>(
    transport: &P,
    kind: RecordKind,
    path: &str,
    mut request: R,
    plan: impl FnOnce(Value) -> Result<PagePlan, PrismError>,
    page: impl Fn(Value, u64) -> Result<Vec<Entity>, PrismError>,
) -> Result<ResultSet, RetrievalError>
where
    P: PageTransport,
    R: Cursor,
{
    let mut results = ResultSet::new();

    let plan = match transport.post_page(path, &request).await.and_then(plan) {
        Ok(plan) => plan,
        Err(e) => return Err(abort(kind, results, e)),
    };
    tracing::info!(
        kind = %kind,
        total = plan.total(),
        pages = plan.len(),
        "Got total of {} {}s",
        plan.total(),
        kind
    );

    if plan.total() == 0 {
        return Ok(results);
    }

    for cursor in plan.cursors() {
        request.advance_to(cursor);
        tracing::debug!(kind = %kind, path, offset = cursor, "Requesting page");

        let entities = transport
            .post_page(path, &request)
            .await
            .and_then(|body| page(body, cursor));
        match entities {
            Ok(entities) => {
                tracing::info!(
                    kind = %kind,
                    offset = cursor,
                    received = entities.len(),
                    "Got {} {}s",
                    entities.len(),
                    kind
                );
                results.append(entities);
            }
            Err(e) => return Err(abort(kind, results, e)),
        }
    }

    Ok(results)
}

/// Wrap a page failure together with what was collected before it.
fn abort(kind: RecordKind, partial: ResultSet, source: PrismError) -> RetrievalError {
    tracing::error!(
        event = "retrieval_aborted",
        kind = %kind,
        collected = partial.len(),
        error = %source,
        "Retrieval aborted"
    );
    RetrievalError::new(kind, partial, source)
}

// =============================================================================
// TEST SUPPORT
// =============================================================================
