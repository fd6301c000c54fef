//! Organization request handlers
//!
//! [`OrganizationHandler`] holds the collaborators and implements each
//! operation as validated parameters in, envelope or [`ApiError`] out. The
//! axum route functions at the bottom of the file only extract parameters and
//! delegate.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use super::error::{ApiError, ApiOperation};
use super::query::{
    OrganizationListParams, OrganizationMemberListParams, OrganizationParams,
    OrganizationSearchParams,
};
use super::reconcile::reconcile;
use super::response::{paginate, CountResponse, PageEnvelope};
use crate::config::{SearchConfig, TotalPolicy};
use crate::error::Error;
use crate::models::{Organization, OrganizationGroup, OrganizationUser, OrganizationWorkspace};
use crate::repository::{OrganizationRepository, Page, Pagination};
use crate::search::SearchIndex;
use crate::state::AppState;

/// Search behaviour for the organization index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub index: String,
    pub total_policy: TotalPolicy,
    pub resolve_concurrency: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            index: config.index.clone(),
            total_policy: config.total_policy,
            resolve_concurrency: config.resolve_concurrency,
        }
    }
}

/// Organization operations over the canonical store and search index
#[derive(Clone)]
pub struct OrganizationHandler {
    repository: Arc<dyn OrganizationRepository>,
    search: Arc<dyn SearchIndex>,
    settings: SearchSettings,
}

impl std::fmt::Debug for OrganizationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationHandler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn envelope<T>(page: Page<T>, pagination: Pagination) -> PageEnvelope<T> {
    PageEnvelope::new(page.items, paginate(page.total, pagination))
}

impl OrganizationHandler {
    pub fn new(
        repository: Arc<dyn OrganizationRepository>,
        search: Arc<dyn SearchIndex>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            repository,
            search,
            settings,
        }
    }

    pub fn repository(&self) -> &Arc<dyn OrganizationRepository> {
        &self.repository
    }

    pub fn search_index(&self) -> &Arc<dyn SearchIndex> {
        &self.search
    }

    /// Fetch one organization
    pub async fn get(&self, id: &str) -> Result<Organization, ApiError> {
        self.repository
            .fetch_organization(id)
            .await
            .map_err(|e| ApiError::classify(ApiOperation::Get, e))
    }

    /// Count all organizations
    pub async fn count(&self) -> Result<CountResponse, ApiError> {
        let count = self
            .repository
            .fetch_organization_count()
            .await
            .map_err(|e| ApiError::classify(ApiOperation::Count, e))?;
        Ok(CountResponse { count })
    }

    /// List one page of all organizations
    pub async fn list_all(
        &self,
        pagination: Pagination,
    ) -> Result<PageEnvelope<Organization>, ApiError> {
        let page = self
            .repository
            .fetch_organizations(pagination)
            .await
            .map_err(|e| ApiError::classify(ApiOperation::List, e))?;
        Ok(envelope(page, pagination))
    }

    /// Search organizations and resolve the hits against the store
    pub async fn search(
        &self,
        query: &str,
        pagination: Pagination,
    ) -> Result<PageEnvelope<Organization>, ApiError> {
        let classify = |e| ApiError::classify(ApiOperation::Search, e);

        let results = self
            .search
            .search(
                &self.settings.index,
                query,
                pagination.page().get(),
                pagination.size().get(),
            )
            .await
            .map_err(classify)?;

        let engine_total = results.total_hits;
        let hit_count = results.hits.len();

        let repository = &self.repository;
        let records = reconcile(results.hits, self.settings.resolve_concurrency, |id| {
            async move { repository.fetch_organization(&id).await }
        })
        .await
        .map_err(classify)?;

        let total = match self.settings.total_policy {
            TotalPolicy::Reported => hit_count as u64,
            TotalPolicy::Engine => engine_total,
            TotalPolicy::Reconciled => records.len() as u64,
        };

        tracing::debug!(
            query,
            hits = hit_count,
            resolved = records.len(),
            total,
            "Organization search reconciled"
        );

        Ok(PageEnvelope::new(records, paginate(total, pagination)))
    }

    /// List one page of an organization's users
    pub async fn list_users(
        &self,
        id: &str,
        pagination: Pagination,
    ) -> Result<PageEnvelope<OrganizationUser>, ApiError> {
        let page = self
            .repository
            .fetch_organization_users(id, pagination)
            .await
            .map_err(|e| ApiError::classify(ApiOperation::ListUsers, e))?;
        Ok(envelope(page, pagination))
    }

    /// List one page of an organization's workspaces
    pub async fn list_workspaces(
        &self,
        id: &str,
        pagination: Pagination,
    ) -> Result<PageEnvelope<OrganizationWorkspace>, ApiError> {
        let page = self
            .repository
            .fetch_organization_workspaces(id, pagination)
            .await
            .map_err(|e| ApiError::classify(ApiOperation::ListWorkspaces, e))?;
        Ok(envelope(page, pagination))
    }

    /// List one page of an organization's groups
    pub async fn list_groups(
        &self,
        id: &str,
        pagination: Pagination,
    ) -> Result<PageEnvelope<OrganizationGroup>, ApiError> {
        let page = self
            .repository
            .fetch_organization_groups(id, pagination)
            .await
            .map_err(|e| ApiError::classify(ApiOperation::ListGroups, e))?;
        Ok(envelope(page, pagination))
    }
}

/// Error type for the organization routes
///
/// Parameter problems are service errors (422); collaborator failures are
/// classified outcomes.
#[derive(Debug)]
pub enum RouteError {
    Invalid(Error),
    Api(ApiError),
}

impl From<Error> for RouteError {
    fn from(err: Error) -> Self {
        Self::Invalid(err)
    }
}

impl From<ApiError> for RouteError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl axum::response::IntoResponse for RouteError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Invalid(e) => e.into_response(),
            Self::Api(e) => e.into_response(),
        }
    }
}

fn params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| Error::ValidationError(rejection.body_text()))
}

/// `GET /organization?id=`
pub async fn get_organization(
    State(state): State<AppState>,
    query: Result<Query<OrganizationParams>, QueryRejection>,
) -> Result<Json<Organization>, RouteError> {
    let params = params(query)?;
    Ok(Json(state.organizations().get(&params.id).await?))
}

/// `GET /organization/count`
pub async fn get_organization_count(
    State(state): State<AppState>,
) -> Result<CountResponse, RouteError> {
    Ok(state.organizations().count().await?)
}

/// `GET /organization/all?page&size`
pub async fn list_organizations(
    State(state): State<AppState>,
    query: Result<Query<OrganizationListParams>, QueryRejection>,
) -> Result<PageEnvelope<Organization>, RouteError> {
    let pagination = params(query)?.pagination()?;
    Ok(state.organizations().list_all(pagination).await?)
}

/// `GET /organization/search?query&page&size`
pub async fn search_organizations(
    State(state): State<AppState>,
    query: Result<Query<OrganizationSearchParams>, QueryRejection>,
) -> Result<PageEnvelope<Organization>, RouteError> {
    let params = params(query)?;
    let pagination = params.pagination()?;
    Ok(state
        .organizations()
        .search(params.query(), pagination)
        .await?)
}

/// `GET /organization/users?id&page&size`
pub async fn list_organization_users(
    State(state): State<AppState>,
    query: Result<Query<OrganizationMemberListParams>, QueryRejection>,
) -> Result<PageEnvelope<OrganizationUser>, RouteError> {
    let params = params(query)?;
    let pagination = params.pagination()?;
    Ok(state
        .organizations()
        .list_users(&params.id, pagination)
        .await?)
}

/// `GET /organization/workspaces?id&page&size`
pub async fn list_organization_workspaces(
    State(state): State<AppState>,
    query: Result<Query<OrganizationMemberListParams>, QueryRejection>,
) -> Result<PageEnvelope<OrganizationWorkspace>, RouteError> {
    let params = params(query)?;
    let pagination = params.pagination()?;
    Ok(state
        .organizations()
        .list_workspaces(&params.id, pagination)
        .await?)
}

/// `GET /organization/groups?id&page&size`
pub async fn list_organization_groups(
    State(state): State<AppState>,
    query: Result<Query<OrganizationMemberListParams>, QueryRejection>,
) -> Result<PageEnvelope<OrganizationGroup>, RouteError> {
    let params = params(query)?;
    let pagination = params.pagination()?;
    Ok(state
        .organizations()
        .list_groups(&params.id, pagination)
        .await?)
}
