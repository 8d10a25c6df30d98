//! # Response Decoding
//!
//! Typed views of the two listing responses. Only the paging fields are
//! required; everything under `entities` / `entity_results` stays opaque.

use crate::{Entity, PrismError};
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// FLAT LISTING
// =============================================================================

/// Paging metadata of a `<kind>s/list` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListMetadata {
    pub offset: u64,
    pub total_matches: u64,
}

/// The first `<kind>s/list` response, which sets the page plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListResponse {
    pub metadata: ListMetadata,
}

impl ListResponse {
    /// Decode from a JSON body. Only `metadata` is read.
    pub fn from_value(body: Value) -> Result<Self, PrismError> {
        serde_json::from_value(body)
            .map_err(|e| PrismError::MalformedResponse(format!("list response: {e}")))
    }
}

/// A later `<kind>s/list` page. Only `entities` is read; the metadata was
/// already consumed by the plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl ListPage {
    /// Decode from a JSON body. Missing `entities` reads as an empty page.
    pub fn from_value(body: Value) -> Result<Self, PrismError> {
        serde_json::from_value(body)
            .map_err(|e| PrismError::MalformedResponse(format!("list page: {e}")))
    }
}

// =============================================================================
// GROUPED LISTING
// =============================================================================

/// The first `groups` response, which sets the page plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GroupResponse {
    pub filtered_entity_count: u64,
}

impl GroupResponse {
    /// Decode from a JSON body. Only `filtered_entity_count` is read.
    pub fn from_value(body: Value) -> Result<Self, PrismError> {
        serde_json::from_value(body)
            .map_err(|e| PrismError::MalformedResponse(format!("groups response: {e}")))
    }
}

/// One group of a `groups` page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupResult {
    #[serde(default)]
    pub entity_results: Vec<Entity>,
}

/// A later `groups` page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupPage {
    #[serde(default)]
    pub group_results: Vec<GroupResult>,
}

impl GroupPage {
    /// Decode from a JSON body.
    pub fn from_value(body: Value) -> Result<Self, PrismError> {
        serde_json::from_value(body)
            .map_err(|e| PrismError::MalformedResponse(format!("groups page: {e}")))
    }

    /// Members of the first group.
    ///
    /// The query asks for exactly one group, so a page without one is an
    /// error for the whole retrieval rather than an empty page.
    pub fn into_first_group_entities(self, offset: u64) -> Result<Vec<Entity>, PrismError> {
        self.group_results
            .into_iter()
            .next()
            .map(|group| group.entity_results)
            .ok_or(PrismError::EmptyGroupPage { offset })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_response_reads_metadata() {
        let response = ListResponse::from_value(json!({
            "api_version": "3.1",
            "metadata": {"kind": "audit", "offset": 0, "length": 10, "total_matches": 250},
            "entities": [{"uuid": "a"}, {"uuid": "b"}]
        }))
        .unwrap();

        assert_eq!(response.metadata.total_matches, 250);
        assert_eq!(response.metadata.offset, 0);
    }

    #[test]
    fn list_response_without_metadata_is_malformed() {
        let result = ListResponse::from_value(json!({"entities": []}));
        assert!(matches!(result, Err(PrismError::MalformedResponse(_))));
    }

    #[test]
    fn list_response_with_non_numeric_total_is_malformed() {
        let result = ListResponse::from_value(json!({
            "metadata": {"offset": 0, "total_matches": "lots"}
        }));
        assert!(matches!(result, Err(PrismError::MalformedResponse(_))));
    }

    #[test]
    fn list_page_needs_no_metadata() {
        let page = ListPage::from_value(json!({"entities": [{"uuid": "a"}, {"uuid": "b"}]})).unwrap();

        assert_eq!(page.entities.len(), 2);
        assert_eq!(page.entities[1]["uuid"], "b");
    }

    #[test]
    fn list_page_without_entities_is_empty() {
        let page = ListPage::from_value(json!({
            "metadata": {"offset": 100, "total_matches": 250}
        }))
        .unwrap();

        assert!(page.entities.is_empty());
    }

    #[test]
    fn list_page_with_non_array_entities_is_malformed() {
        let result = ListPage::from_value(json!({"entities": "none"}));
        assert!(matches!(result, Err(PrismError::MalformedResponse(_))));
    }

    #[test]
    fn group_response_reads_the_count() {
        let response = GroupResponse::from_value(json!({
            "filtered_entity_count": 2,
            "group_results": []
        }))
        .unwrap();

        assert_eq!(response.filtered_entity_count, 2);
    }

    #[test]
    fn group_response_without_count_is_malformed() {
        let result = GroupResponse::from_value(json!({"group_results": []}));
        assert!(matches!(result, Err(PrismError::MalformedResponse(_))));
    }

    #[test]
    fn group_page_reads_first_group_without_a_count() {
        let page = GroupPage::from_value(json!({
            "group_results": [
                {"entity_results": [{"entity_id": "e1"}, {"entity_id": "e2"}]},
                {"entity_results": [{"entity_id": "ignored"}]}
            ]
        }))
        .unwrap();

        let entities = page.into_first_group_entities(0).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0]["entity_id"], "e1");
    }

    #[test]
    fn group_page_without_groups_fails_on_read() {
        let page = GroupPage::from_value(json!({
            "filtered_entity_count": 5,
            "group_results": []
        }))
        .unwrap();

        let result = page.into_first_group_entities(999);
        assert!(matches!(result, Err(PrismError::EmptyGroupPage { offset: 999 })));
    }

    #[test]
    fn group_without_entity_results_is_empty() {
        let page = GroupPage::from_value(json!({
            "group_results": [{"group_by_column_value": null}]
        }))
        .unwrap();

        assert!(page.into_first_group_entities(0).unwrap().is_empty());
    }
}
