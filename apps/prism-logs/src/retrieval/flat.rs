//! Flat `<kind>s/list` pagination.
//!
//! A short probe page learns the total; then pages of 100 are requested from
//! the reported offset up to that total. The plan is fixed after the probe:
//! short or empty pages do not end the loop early and a growing total does
//! not extend it.

use super::{PageTransport, page_through};
use prism_logs_core::{
    ListPage, ListResponse, PagePlan, PageRequest, RecordKind, ResultSet, RetrievalError,
    RetrievalStrategy, TimeWindow,
};

/// Retrieval of one flat-listed record kind.
#[derive(Debug, Clone)]
pub struct FlatRetrieval {
    strategy: RetrievalStrategy,
    window: TimeWindow,
}

impl FlatRetrieval {
    #[must_use]
    pub fn new(strategy: RetrievalStrategy, window: TimeWindow) -> Self {
        Self { strategy, window }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.strategy.kind()
    }

    pub async fn run<P: PageTransport>(&self, transport: &P) -> Result<ResultSet, RetrievalError> {
        let request = PageRequest::probe(
            self.strategy.kind(),
            self.strategy.sort_attribute(),
            &self.window,
        );

        page_through(
            transport,
            self.strategy.kind(),
            &self.strategy.path(),
            request,
            |body| {
                let probe = ListResponse::from_value(body)?;
                Ok(PagePlan::flat(probe.metadata.offset, probe.metadata.total_matches))
            },
            |body, _| ListPage::from_value(body).map(|page| page.entities),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::super::scripted::*;
    use super::*;
    use prism_logs_core::PrismError;
    use serde_json::{Value, json};

    fn list_page(offset: u64, total: u64, entities: Vec<Value>) -> Result<Value, PrismError> {
        Ok(json!({
            "metadata": {"kind": "audit", "offset": offset, "total_matches": total},
            "entities": entities
        }))
    }

    fn audits() -> FlatRetrieval {
        FlatRetrieval::new(RecordKind::Audit.strategy(), window())
    }

    #[tokio::test]
    async fn total_of_250_fetches_three_pages_in_order() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 250, entities(99, 10)),
            list_page(0, 250, entities(0, 100)),
            list_page(100, 250, entities(1, 100)),
            list_page(200, 250, entities(2, 50)),
        ]);

        let results = audits().run(&transport).await.unwrap();

        let bodies = transport.bodies();
        assert_eq!(bodies.len(), 4);
        assert_eq!(bodies[0]["length"], 10);
        assert_eq!(bodies[0]["offset"], 0);
        let pages: Vec<_> = bodies[1..]
            .iter()
            .map(|b| (b["offset"].as_u64().unwrap(), b["length"].as_u64().unwrap()))
            .collect();
        assert_eq!(pages, vec![(0, 100), (100, 100), (200, 100)]);

        assert_eq!(results.len(), 250);
        let entities = results.finalize();
        assert_eq!(entities[0]["page"], 0);
        assert_eq!(entities[100]["page"], 1);
        assert_eq!(entities[249]["page"], 2);
    }

    #[tokio::test]
    async fn probe_entities_are_not_collected() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 3, entities(99, 3)),
            list_page(0, 3, entities(0, 3)),
        ]);

        let results = audits().run(&transport).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.entities().iter().all(|e| e["page"] == 0));
    }

    #[tokio::test]
    async fn every_request_uses_the_same_filter_and_path() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 150, vec![]),
            list_page(0, 150, vec![]),
            list_page(100, 150, vec![]),
        ]);

        audits().run(&transport).await.unwrap();

        let requests = transport.requests.borrow();
        assert!(requests.iter().all(|(path, _)| path == "audits/list"));
        let filter = &requests[0].1["filter"];
        assert!(requests.iter().all(|(_, body)| &body["filter"] == filter));
        assert!(requests.iter().all(|(_, body)| body["sort_order"] == "DESCENDING"));
        assert!(requests.iter().all(|(_, body)| body["kind"] == "audit"));
    }

    #[tokio::test]
    async fn short_pages_do_not_shorten_the_plan() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 300, vec![]),
            list_page(0, 300, entities(0, 100)),
            list_page(100, 300, vec![]),
            list_page(200, 300, entities(2, 30)),
        ]);

        let results = audits().run(&transport).await.unwrap();

        assert_eq!(transport.requests.borrow().len(), 4);
        assert_eq!(results.len(), 130);
    }

    #[tokio::test]
    async fn total_growing_mid_retrieval_is_ignored() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 100, vec![]),
            list_page(0, 500, entities(0, 100)),
        ]);

        let results = audits().run(&transport).await.unwrap();

        assert_eq!(transport.requests.borrow().len(), 2);
        assert_eq!(results.len(), 100);
    }

    #[tokio::test]
    async fn reported_offset_is_the_first_cursor() {
        let transport = ScriptedTransport::new(vec![
            list_page(50, 120, vec![]),
            list_page(50, 120, entities(0, 70)),
        ]);

        audits().run(&transport).await.unwrap();

        let bodies = transport.bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1]["offset"], 50);
    }

    #[tokio::test]
    async fn failure_mid_loop_returns_partial_results() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 250, vec![]),
            list_page(0, 250, entities(0, 100)),
            Err(PrismError::Connectivity {
                url: "https://pc:9440/api/nutanix/v3/audits/list".to_string(),
                reason: "connection reset".to_string(),
            }),
        ]);

        let err = audits().run(&transport).await.unwrap_err();

        assert_eq!(err.kind, RecordKind::Audit);
        assert_eq!(err.partial.len(), 100);
        assert!(err.source.is_connectivity());
        assert_eq!(transport.requests.borrow().len(), 3);
    }

    #[tokio::test]
    async fn malformed_probe_aborts_with_nothing_collected() {
        let transport = ScriptedTransport::new(vec![Ok(json!({"entities": []}))]);

        let err = audits().run(&transport).await.unwrap_err();

        assert!(err.partial.is_empty());
        assert!(matches!(err.source, PrismError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn later_pages_are_read_without_metadata() {
        let transport = ScriptedTransport::new(vec![
            list_page(0, 2, vec![]),
            Ok(json!({"entities": [{"a": 1}, {"a": 2}]})),
        ]);

        let results = audits().run(&transport).await.unwrap();

        assert_eq!(results.finalize(), vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[tokio::test]
    async fn path_comes_from_the_kind() {
        let transport = ScriptedTransport::new(vec![list_page(0, 0, vec![])]);

        FlatRetrieval::new(RecordKind::Task.strategy(), window())
            .run(&transport)
            .await
            .unwrap();

        assert_eq!(transport.requests.borrow()[0].0, "tasks/list");
    }
}
