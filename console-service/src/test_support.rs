//! Test doubles and fixtures shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

use crate::config::JwtConfig;
use crate::error::{Error, Result};
use crate::language::{Entity, EntityExtractor};
use crate::middleware::Claims;
use crate::models::{Organization, OrganizationGroup, OrganizationUser, OrganizationWorkspace};
use crate::repository::memory::InMemoryOrganizationRepository;
use crate::repository::{
    OrganizationRepository, Page, Pagination, RepositoryError, RepositoryOperation,
    RepositoryResult,
};
use crate::search::{SearchHit, SearchIndex, SearchResults};

pub const TEST_SECRET: &[u8] = b"console-test-secret-6f1d0c2a9b";

pub fn organization(id: &str, name: &str) -> Organization {
    Organization {
        id: id.to_string(),
        name: name.to_string(),
        create_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        update_time: None,
    }
}

pub fn user(id: &str) -> OrganizationUser {
    OrganizationUser {
        id: id.to_string(),
        username: format!("{id}@example.com"),
        picture: None,
        permission: "viewer".to_string(),
        create_time: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    }
}

pub fn workspace(id: &str, name: &str) -> OrganizationWorkspace {
    OrganizationWorkspace {
        id: id.to_string(),
        name: name.to_string(),
        create_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    }
}

pub fn group(id: &str, name: &str) -> OrganizationGroup {
    OrganizationGroup {
        id: id.to_string(),
        name: name.to_string(),
        create_time: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
    }
}

/// Write [`TEST_SECRET`] to a temp file and point a JWT config at it
pub fn jwt_config(issuer: Option<&str>, audience: Option<&str>) -> (TempDir, JwtConfig) {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("jwt-secret");
    std::fs::write(&key_path, TEST_SECRET).unwrap();
    let config = JwtConfig {
        key_path,
        algorithm: "HS256".to_string(),
        issuer: issuer.map(str::to_string),
        audience: audience.map(str::to_string),
    };
    (dir, config)
}

/// HS256 token for `sub` expiring `ttl_secs` from now (negative for expired)
pub fn mint_token(sub: &str, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        email: None,
        username: None,
        roles: vec!["member".to_string()],
        exp: now + ttl_secs,
        iat: Some(now),
        iss: None,
        aud: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}

type SearchCall = (String, String, u32, u32);

/// Search index returning canned results and recording calls
#[derive(Clone)]
pub struct StubSearch {
    result: std::result::Result<SearchResults, RepositoryError>,
    healthy: bool,
    calls: Arc<Mutex<Vec<SearchCall>>>,
}

impl StubSearch {
    pub fn empty() -> Self {
        Self::with_hits(&[], 0)
    }

    pub fn with_hits(ids: &[&str], total_hits: u64) -> Self {
        Self {
            result: Ok(SearchResults {
                hits: ids.iter().map(|id| SearchHit::new(*id)).collect(),
                total_hits,
            }),
            healthy: true,
            calls: Arc::default(),
        }
    }

    pub fn failing(error: RepositoryError) -> Self {
        Self {
            result: Err(error),
            healthy: false,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<SearchCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl SearchIndex for StubSearch {
    async fn search(
        &self,
        index: &str,
        query: &str,
        page: u32,
        size: u32,
    ) -> RepositoryResult<SearchResults> {
        self.calls
            .lock()
            .unwrap()
            .push((index.to_string(), query.to_string(), page, size));
        self.result.clone()
    }

    async fn health(&self) -> RepositoryResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_failed(
                RepositoryOperation::HealthCheck,
                "search engine down",
            ))
        }
    }
}

/// Repository failing every call with the same error
#[derive(Debug, Clone)]
pub struct FailingRepository {
    error: RepositoryError,
}

impl FailingRepository {
    pub fn new(error: RepositoryError) -> Self {
        Self { error }
    }

    fn fail<T>(&self) -> RepositoryResult<T> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl OrganizationRepository for FailingRepository {
    async fn fetch_organization(&self, _id: &str) -> RepositoryResult<Organization> {
        self.fail()
    }

    async fn fetch_organization_count(&self) -> RepositoryResult<u64> {
        self.fail()
    }

    async fn fetch_organizations(&self, _: Pagination) -> RepositoryResult<Page<Organization>> {
        self.fail()
    }

    async fn fetch_organization_users(
        &self,
        _: &str,
        _: Pagination,
    ) -> RepositoryResult<Page<OrganizationUser>> {
        self.fail()
    }

    async fn fetch_organization_workspaces(
        &self,
        _: &str,
        _: Pagination,
    ) -> RepositoryResult<Page<OrganizationWorkspace>> {
        self.fail()
    }

    async fn fetch_organization_groups(
        &self,
        _: &str,
        _: Pagination,
    ) -> RepositoryResult<Page<OrganizationGroup>> {
        self.fail()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.fail()
    }
}

/// In-memory repository that counts single-record lookups
pub struct CountingRepository {
    inner: Arc<InMemoryOrganizationRepository>,
    lookups: Arc<AtomicUsize>,
}

impl CountingRepository {
    pub fn new(inner: Arc<InMemoryOrganizationRepository>) -> Self {
        Self {
            inner,
            lookups: Arc::default(),
        }
    }

    pub fn lookups(&self) -> Arc<AtomicUsize> {
        self.lookups.clone()
    }
}

#[async_trait]
impl OrganizationRepository for CountingRepository {
    async fn fetch_organization(&self, id: &str) -> RepositoryResult<Organization> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_organization(id).await
    }

    async fn fetch_organization_count(&self) -> RepositoryResult<u64> {
        self.inner.fetch_organization_count().await
    }

    async fn fetch_organizations(&self, p: Pagination) -> RepositoryResult<Page<Organization>> {
        self.inner.fetch_organizations(p).await
    }

    async fn fetch_organization_users(
        &self,
        id: &str,
        p: Pagination,
    ) -> RepositoryResult<Page<OrganizationUser>> {
        self.inner.fetch_organization_users(id, p).await
    }

    async fn fetch_organization_workspaces(
        &self,
        id: &str,
        p: Pagination,
    ) -> RepositoryResult<Page<OrganizationWorkspace>> {
        self.inner.fetch_organization_workspaces(id, p).await
    }

    async fn fetch_organization_groups(
        &self,
        id: &str,
        p: Pagination,
    ) -> RepositoryResult<Page<OrganizationGroup>> {
        self.inner.fetch_organization_groups(id, p).await
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.inner.ping().await
    }
}

/// Extractor tagging every capitalized word, or failing on demand
pub struct StubExtractor {
    pub fail: bool,
}

#[async_trait]
impl EntityExtractor for StubExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        if self.fail {
            return Err(Error::External("model crashed at 10.1.2.3".to_string()));
        }
        Ok(text
            .split_whitespace()
            .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
            .map(|word| Entity {
                text: word.to_string(),
                label: "PROPN".to_string(),
            })
            .collect())
    }
}
