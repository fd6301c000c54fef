//! Search index abstraction
//!
//! The search engine returns ranked identifiers, not records. Handlers resolve
//! each hit against the canonical store (see `handlers::reconcile`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryResult;

pub mod meilisearch;

pub use meilisearch::MeilisearchIndex;

/// A reference to a record returned by the search engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
}

impl SearchHit {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One page of hits plus the engine-reported total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub total_hits: u64,
}

/// Full-text search over a named index
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Query one page of hits (page is 1-indexed)
    async fn search(
        &self,
        index: &str,
        query: &str,
        page: u32,
        size: u32,
    ) -> RepositoryResult<SearchResults>;

    /// Check that the engine is reachable and healthy
    async fn health(&self) -> RepositoryResult<()>;
}
