//! # Aggregator
//!
//! Accumulates pages into one ordered collection.
//!
//! Order is server order within a page, pages concatenated by increasing
//! offset. No deduplication and no rewriting of entity contents.

use crate::{Entity, PrismError, RecordKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered sequence of retrieved entities. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    entities: Vec<Entity>,
}

impl ResultSet {
    /// Create an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page, keeping its order.
    pub fn append(&mut self, page: Vec<Entity>) {
        self.entities.extend(page);
    }

    /// Number of entities collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Borrow the collected entities.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Hand off the accumulated sequence.
    #[must_use]
    pub fn finalize(self) -> Vec<Entity> {
        self.entities
    }
}

impl From<Vec<Entity>> for ResultSet {
    fn from(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

/// A retrieval that stopped part-way.
///
/// Carries whatever was collected before the failing page so the caller can
/// still use it.
#[derive(Debug, Error)]
#[error("{kind} retrieval aborted after {} records: {source}", .partial.len())]
pub struct RetrievalError {
    pub kind: RecordKind,
    pub partial: ResultSet,
    #[source]
    pub source: PrismError,
}

impl RetrievalError {
    #[must_use]
    pub fn new(kind: RecordKind, partial: ResultSet, source: PrismError) -> Self {
        Self {
            kind,
            partial,
            source,
        }
    }

    /// Drop the partial data and keep the cause.
    #[must_use]
    pub fn into_source(self) -> PrismError {
        self.source
    }
}
