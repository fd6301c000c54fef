//! Search hit reconciliation
//!
//! Resolves each search hit against the canonical store. Hits whose record no
//! longer exists are index staleness and are dropped; any other failure fails
//! the whole operation. Lookups run with bounded concurrency but results are
//! consumed in hit order, so the output order matches the hits and the first
//! failing hit in that order decides the error.

use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::repository::RepositoryResult;
use crate::search::SearchHit;

/// Resolve hits into records, preserving hit order
pub async fn reconcile<T, F, Fut>(
    hits: Vec<SearchHit>,
    concurrency: usize,
    resolve: F,
) -> RepositoryResult<Vec<T>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = RepositoryResult<T>>,
{
    let mut records = Vec::with_capacity(hits.len());
    let mut lookups = stream::iter(hits)
        .map(|hit| {
            let lookup = resolve(hit.id.clone());
            async move { (hit.id, lookup.await) }
        })
        .buffered(concurrency.max(1));

    while let Some((id, result)) = lookups.next().await {
        match result {
            Ok(record) => records.push(record),
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %id, "Dropping stale search hit");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(records)
}
