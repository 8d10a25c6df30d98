//! # Wire Contract Tests (W0-W2)
//!
//! The request and response shapes Prism Central expects. If any of these
//! break, retrieval against a real server breaks.
//!
//! ## Tiers
//! - W0: Window filter encoding
//! - W1: Flat listing paging
//! - W2: Grouped listing paging

#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::{TimeZone, Utc};
use prism_logs_core::{
    GroupPage, GroupPageRequest, ListPage, ListResponse, PagePlan, PageRequest, PrismError,
    RecordKind, ResultSet, RetrievalStrategy, TimeWindow,
};
use serde_json::json;

fn first_hour_of_2024() -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
    )
}

// =============================================================================
// TIER W0: WINDOW FILTER
// =============================================================================

mod w0_window_filter {
    use super::*;

    /// W0.1: Filter uses ge on start and lt on end, in microseconds.
    #[test]
    fn filter_is_ge_start_lt_end() {
        assert_eq!(
            first_hour_of_2024().to_filter("attr"),
            "(attr=ge=1704067200000000;attr=lt=1704070800000000)"
        );
    }

    /// W0.2: Both query shapes carry the same filter for the same window.
    #[test]
    fn both_shapes_share_the_filter() {
        let window = first_hour_of_2024();
        let flat = PageRequest::probe(RecordKind::Alert, "_created_timestamp_usecs_", &window);
        let grouped = GroupPageRequest::new(
            RecordKind::Event,
            "_created_timestamp_usecs_",
            &window,
            Utc::now(),
        );

        assert_eq!(flat.filter, grouped.filter_criteria);
    }
}

// =============================================================================
// TIER W1: FLAT PAGING
// =============================================================================

mod w1_flat_paging {
    use super::*;

    /// W1.1: 250 matches → pages at 0, 100, 200 of length 100.
    #[test]
    fn total_of_250_plans_three_pages() {
        let probe = ListResponse::from_value(json!({
            "metadata": {"offset": 0, "total_matches": 250},
            "entities": []
        }))
        .unwrap();
        let plan = PagePlan::flat(probe.metadata.offset, probe.metadata.total_matches);

        let mut request =
            PageRequest::probe(RecordKind::Audit, "op_start_timestamp_usecs", &first_hour_of_2024());
        let mut sent = Vec::new();
        for cursor in plan.cursors() {
            request.advance_to(cursor);
            sent.push((request.offset, request.length));
        }

        assert_eq!(sent, vec![(0, 100), (100, 100), (200, 100)]);
    }

    /// W1.2: Short pages shrink the result, never the plan.
    #[test]
    fn short_pages_are_tolerated() {
        let plan = PagePlan::flat(0, 250);
        let mut results = ResultSet::new();
        let page_sizes = [100usize, 40, 50];

        for (_, size) in plan.cursors().zip(page_sizes) {
            results.append(vec![json!({}); size]);
        }

        assert_eq!(plan.len(), 3);
        assert_eq!(results.len(), 190);
    }

    /// W1.3: Pages after the first are read for their entities alone.
    #[test]
    fn later_pages_need_no_metadata() {
        let page = ListPage::from_value(json!({"entities": [{"id": 1}, {"id": 2}]})).unwrap();

        assert_eq!(page.entities.len(), 2);
    }

    /// W1.4: Zero matches needs no further pages.
    #[test]
    fn zero_matches_plans_nothing() {
        let probe = ListResponse::from_value(json!({
            "metadata": {"offset": 0, "total_matches": 0}
        }))
        .unwrap();

        assert!(PagePlan::flat(probe.metadata.offset, probe.metadata.total_matches).is_empty());
    }
}

// =============================================================================
// TIER W2: GROUPED PAGING
// =============================================================================

mod w2_grouped_paging {
    use super::*;

    /// W2.1: Events are the only grouped kind.
    #[test]
    fn only_events_are_grouped() {
        for kind in RecordKind::ALL {
            let grouped = matches!(kind.strategy(), RetrievalStrategy::Grouped { .. });
            assert_eq!(grouped, kind == RecordKind::Event);
        }
    }

    /// W2.2: Each page reads the first group only.
    #[test]
    fn first_group_is_read() {
        let page = GroupPage::from_value(json!({
            "group_results": [{"entity_results": [{"id": 1}, {"id": 2}, {"id": 3}]}]
        }))
        .unwrap();

        assert_eq!(page.into_first_group_entities(0).unwrap().len(), 3);
    }

    /// W2.3: A page with no groups for a non-zero total is fatal.
    #[test]
    fn missing_group_is_fatal() {
        let page = GroupPage::from_value(json!({"filtered_entity_count": 3})).unwrap();

        assert!(matches!(
            page.into_first_group_entities(0),
            Err(PrismError::EmptyGroupPage { offset: 0 })
        ));
    }
}
