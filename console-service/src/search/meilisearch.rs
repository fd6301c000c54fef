//! Meilisearch client
//!
//! Talks to the engine's REST API with page-based pagination
//! (`page` / `hitsPerPage`), which makes the engine report an exact
//! `totalHits` for the query.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{SearchHit, SearchIndex, SearchResults};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::repository::{RepositoryError, RepositoryOperation, RepositoryResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    hits: Vec<RawHit>,
    #[serde(default)]
    total_hits: Option<u64>,
    #[serde(default)]
    estimated_total_hits: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl SearchResponse {
    fn into_results(self) -> SearchResults {
        let reported = self.hits.len() as u64;
        let total_hits = self
            .total_hits
            .or(self.estimated_total_hits)
            .unwrap_or(reported);

        let hits = self
            .hits
            .into_iter()
            .filter_map(|hit| match hit.id {
                serde_json::Value::String(id) => Some(SearchHit::new(id)),
                serde_json::Value::Number(id) => Some(SearchHit::new(id.to_string())),
                other => {
                    tracing::warn!(id = %other, "Skipping search hit with unusable id");
                    None
                }
            })
            .collect();

        SearchResults { hits, total_hits }
    }
}

/// Search index backed by a Meilisearch server
#[derive(Debug, Clone)]
pub struct MeilisearchIndex {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MeilisearchIndex {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build search client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl SearchIndex for MeilisearchIndex {
    async fn search(
        &self,
        index: &str,
        query: &str,
        page: u32,
        size: u32,
    ) -> RepositoryResult<SearchResults> {
        let url = format!("{}/indexes/{}/search", self.base_url, index);
        let body = json!({
            "q": query,
            "page": page,
            "hitsPerPage": size,
            "attributesToRetrieve": ["id"],
        });

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RepositoryError::search_failed(format!(
                "Search on index '{}' returned {}: {}",
                index, status, detail
            )));
        }

        let results = response.json::<SearchResponse>().await?.into_results();
        tracing::debug!(
            index,
            page,
            size,
            hits = results.hits.len(),
            total_hits = results.total_hits,
            "Search completed"
        );
        Ok(results)
    }

    async fn health(&self) -> RepositoryResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::HealthCheck))?;

        if !response.status().is_success() {
            return Err(RepositoryError::connection_failed(
                RepositoryOperation::HealthCheck,
                format!("Search engine health returned {}", response.status()),
            ));
        }

        let health = response
            .json::<HealthResponse>()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::HealthCheck))?;
        if health.status == "available" {
            Ok(())
        } else {
            Err(RepositoryError::connection_failed(
                RepositoryOperation::HealthCheck,
                format!("Search engine status is '{}'", health.status),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::Value;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(url: String) -> SearchConfig {
        SearchConfig {
            url,
            api_key: Some("master-key".to_string()),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn new_builds_client_and_trims_base_url() {
        let index = MeilisearchIndex::new(&config("http://meili:7700/".to_string())).unwrap();
        assert_eq!(index.base_url, "http://meili:7700");
        assert_eq!(index.api_key.as_deref(), Some("master-key"));
    }

    #[test]
    fn numeric_ids_become_strings() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": [{"id": "org_1"}, {"id": 42}, {"id": null}],
            "totalHits": 17
        }))
        .unwrap();
        let results = response.into_results();
        assert_eq!(
            results.hits,
            vec![SearchHit::new("org_1"), SearchHit::new("42")]
        );
        assert_eq!(results.total_hits, 17);
    }

    #[test]
    fn falls_back_to_estimated_total() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": [{"id": "a"}],
            "estimatedTotalHits": 9
        }))
        .unwrap();
        assert_eq!(response.into_results().total_hits, 9);
    }

    #[tokio::test]
    async fn search_posts_page_query_with_api_key() {
        let router = Router::new().route(
            "/indexes/{index}/search",
            post(
                |Path(index): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(index, "organization");
                    assert_eq!(
                        headers.get("authorization").unwrap(),
                        "Bearer master-key"
                    );
                    assert_eq!(body["q"], "acme");
                    assert_eq!(body["page"], 2);
                    assert_eq!(body["hitsPerPage"], 5);
                    Json(json!({
                        "hits": [{"id": "org_3"}, {"id": "org_1"}],
                        "totalHits": 7,
                        "page": 2,
                        "hitsPerPage": 5
                    }))
                },
            ),
        );
        let index = MeilisearchIndex::new(&config(spawn(router).await)).unwrap();

        let results = index.search("organization", "acme", 2, 5).await.unwrap();
        assert_eq!(results.total_hits, 7);
        assert_eq!(results.hits[0].id, "org_3");
        assert_eq!(results.hits[1].id, "org_1");
    }

    #[tokio::test]
    async fn engine_error_is_search_failure() {
        let router = Router::new().route(
            "/indexes/{index}/search",
            post(|| async { (StatusCode::BAD_REQUEST, "invalid_search_q") }),
        );
        let index = MeilisearchIndex::new(&config(spawn(router).await)).unwrap();

        let err = index.search("organization", "", 1, 10).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::SearchFailed);
        assert!(err.message.contains("invalid_search_q"));
    }

    #[tokio::test]
    async fn health_requires_available_status() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "available"})) }),
        );
        let index = MeilisearchIndex::new(&config(spawn(router).await)).unwrap();
        assert!(index.health().await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_engine_fails_health() {
        let index = MeilisearchIndex::new(&config("http://127.0.0.1:1".to_string())).unwrap();
        let err = index.health().await.unwrap_err();
        assert_eq!(err.operation, RepositoryOperation::HealthCheck);
    }
}
