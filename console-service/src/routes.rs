//! Route table
//!
//! Every `/organization` route sits behind the JWT gate. Health probes and
//! entity extraction are open.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{entities, organization};
use crate::health;
use crate::middleware::JwtAuth;
use crate::state::AppState;

/// Build the application router
pub fn build_router(state: AppState, jwt: JwtAuth) -> Router {
    let organization_routes = Router::new()
        .route("/organization", get(organization::get_organization))
        .route(
            "/organization/count",
            get(organization::get_organization_count),
        )
        .route("/organization/all", get(organization::list_organizations))
        .route(
            "/organization/search",
            get(organization::search_organizations),
        )
        .route(
            "/organization/users",
            get(organization::list_organization_users),
        )
        .route(
            "/organization/workspaces",
            get(organization::list_organization_workspaces),
        )
        .route(
            "/organization/groups",
            get(organization::list_organization_groups),
        )
        .route_layer(middleware::from_fn_with_state(jwt, JwtAuth::middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .route("/v3/entities", post(entities::extract_entities))
        .merge(organization_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::handlers::{OrganizationHandler, SearchSettings};
    use crate::language::ModelRegistry;
    use crate::repository::memory::InMemoryOrganizationRepository;
    use crate::repository::{OrganizationRepository, RepositoryError, RepositoryOperation};
    use crate::test_support::{
        jwt_config, mint_token, organization, FailingRepository, StubExtractor, StubSearch,
    };

    struct TestApp {
        router: Router,
        token: String,
        _keys: TempDir,
    }

    impl TestApp {
        fn new(
            repository: Arc<dyn OrganizationRepository>,
            search: StubSearch,
            extractors: ModelRegistry,
        ) -> Self {
            let (keys, jwt) = jwt_config(None, None);
            let handler =
                OrganizationHandler::new(repository, Arc::new(search), SearchSettings::default());
            let state = AppState::new(Config::default(), handler, extractors);
            let router = build_router(state, JwtAuth::new(&jwt).unwrap());
            Self {
                router,
                token: mint_token("usr_test", 3600),
                _keys: keys,
            }
        }

        async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
            let request = Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", self.token))
                .body(Body::empty())
                .unwrap();
            send(self.router.clone(), request).await
        }

        async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            send(self.router.clone(), request).await
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn seeded(count: usize) -> Arc<InMemoryOrganizationRepository> {
        let repo = Arc::new(InMemoryOrganizationRepository::new());
        for i in 0..count {
            repo.insert_organization(organization(&format!("org_{i:02}"), &format!("Org {i}")))
                .await;
        }
        repo
    }

    fn no_models() -> ModelRegistry {
        ModelRegistry::new()
    }

    #[tokio::test]
    async fn organization_routes_require_token() {
        let app = TestApp::new(seeded(1).await, StubSearch::empty(), no_models());
        let request = Request::builder()
            .uri("/organization/count")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app.router.clone(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let app = TestApp::new(seeded(1).await, StubSearch::empty(), no_models());
        let request = Request::builder()
            .uri("/organization/count")
            .header("authorization", format!("Bearer {}", mint_token("usr_test", -600)))
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(app.router.clone(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_all_returns_first_page() {
        let app = TestApp::new(seeded(23).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization/all?page=1&size=10").await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["totalElements"], 23);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["page"], 1);
        assert_eq!(body["size"], 10);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
        assert_eq!(body["data"][0]["id"], "org_00");
    }

    #[tokio::test]
    async fn list_all_uses_default_paging() {
        let app = TestApp::new(seeded(12).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization/all").await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["page"], 1);
        assert_eq!(body["size"], 10);
        assert_eq!(body["totalPages"], 2);
    }

    #[tokio::test]
    async fn zero_size_is_unprocessable() {
        let app = TestApp::new(seeded(3).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization/all?page=1&size=0").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(&body)["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_id_is_unprocessable() {
        let app = TestApp::new(seeded(3).await, StubSearch::empty(), no_models());
        let (status, _) = app.get("/organization").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn get_returns_record() {
        let app = TestApp::new(seeded(3).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization?id=org_01").await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["id"], "org_01");
        assert_eq!(body["name"], "Org 1");
    }

    #[tokio::test]
    async fn unknown_organization_is_not_found_envelope() {
        let app = TestApp::new(seeded(3).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization?id=org_nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = json(&body);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["status"], 404);
        assert!(body["userMessage"].is_string());
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn empty_store_is_no_content() {
        let app = TestApp::new(seeded(0).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization/all?page=1&size=10").await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn count_reports_store_size() {
        let app = TestApp::new(seeded(7).await, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization/count").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["count"], 7);
    }

    #[tokio::test]
    async fn store_failure_hides_detail() {
        let repo = Arc::new(FailingRepository::new(RepositoryError::database_error(
            RepositoryOperation::FetchCount,
            "connection reset by 10.0.0.7",
        )));
        let app = TestApp::new(repo, StubSearch::empty(), no_models());
        let (status, body) = app.get("/organization/count").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "UNKNOWN");
        assert!(!String::from_utf8_lossy(&body).contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn search_skips_stale_hits() {
        let search = StubSearch::with_hits(&["org_02", "org_gone", "org_00"], 3);
        let calls = search.calls();
        let app = TestApp::new(seeded(3).await, search, no_models());

        let (status, body) = app.get("/organization/search?query=org&page=1&size=10").await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["totalElements"], 3);
        let ids: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["org_02", "org_00"]);

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            [("organization".to_string(), "org".to_string(), 1, 10)]
        );
    }

    #[tokio::test]
    async fn members_of_unknown_organization_is_not_found() {
        let app = TestApp::new(seeded(1).await, StubSearch::empty(), no_models());
        let (status, _) = app.get("/organization/groups?id=org_nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn entities_use_registered_model() {
        let models = ModelRegistry::new().with("en", Arc::new(StubExtractor { fail: false }));
        let app = TestApp::new(seeded(0).await, StubSearch::empty(), models);

        let (status, body) = app
            .post_json(
                "/v3/entities",
                serde_json::json!({"language": "en", "text": "Ada met Grace in london"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        let texts: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["text"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(texts, ["Ada", "Grace"]);
    }

    #[tokio::test]
    async fn entities_reject_unknown_language() {
        let app = TestApp::new(seeded(0).await, StubSearch::empty(), no_models());
        let (status, body) = app
            .post_json("/v3/entities", serde_json::json!({"language": "xx", "text": "hi"}))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn entities_hide_model_failure() {
        let models = ModelRegistry::new().with("en", Arc::new(StubExtractor { fail: true }));
        let app = TestApp::new(seeded(0).await, StubSearch::empty(), models);
        let (status, body) = app
            .post_json("/v3/entities", serde_json::json!({"language": "en", "text": "hi"}))
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!String::from_utf8_lossy(&body).contains("10.1.2.3"));
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = TestApp::new(seeded(0).await, StubSearch::empty(), no_models());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app.router.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["status"], "healthy");
    }

    #[tokio::test]
    async fn ready_when_dependencies_respond() {
        let app = TestApp::new(seeded(0).await, StubSearch::empty(), no_models());
        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let (status, body) = send(app.router.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["ready"], true);
    }

    #[tokio::test]
    async fn not_ready_when_store_is_down() {
        let repo = Arc::new(FailingRepository::new(RepositoryError::connection_failed(
            RepositoryOperation::HealthCheck,
            "refused",
        )));
        let app = TestApp::new(repo, StubSearch::empty(), no_models());
        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let (status, body) = send(app.router.clone(), request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body = json(&body);
        assert_eq!(body["ready"], false);
        assert_eq!(body["dependencies"]["store"]["healthy"], false);
        assert_eq!(body["dependencies"]["search"]["healthy"], true);
    }

    #[tokio::test]
    async fn not_ready_when_search_is_down() {
        let search = StubSearch::failing(RepositoryError::search_failed("index missing"));
        let app = TestApp::new(seeded(1).await, search, no_models());
        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let (status, body) = send(app.router.clone(), request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json(&body)["dependencies"]["search"]["healthy"], false);
    }
}
