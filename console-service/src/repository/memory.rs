//! In-memory repository
//!
//! Used when no database is configured (local development) and as the store
//! behind handler tests. Records are kept in insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::traits::{OrganizationRepository, Page, RepositoryResult};
use crate::models::{Organization, OrganizationGroup, OrganizationUser, OrganizationWorkspace};

#[derive(Debug, Default)]
struct Members {
    users: Vec<OrganizationUser>,
    workspaces: Vec<OrganizationWorkspace>,
    groups: Vec<OrganizationGroup>,
}

#[derive(Debug, Default)]
struct Inner {
    organizations: Vec<Organization>,
    members: HashMap<String, Members>,
}

/// Repository backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryOrganizationRepository {
    inner: RwLock<Inner>,
}

impl InMemoryOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an organization
    pub async fn insert_organization(&self, organization: Organization) {
        let mut inner = self.inner.write().await;
        match inner
            .organizations
            .iter_mut()
            .find(|existing| existing.id == organization.id)
        {
            Some(existing) => *existing = organization,
            None => inner.organizations.push(organization),
        }
    }

    pub async fn insert_user(&self, organization_id: &str, user: OrganizationUser) {
        let mut inner = self.inner.write().await;
        inner
            .members
            .entry(organization_id.to_string())
            .or_default()
            .users
            .push(user);
    }

    pub async fn insert_workspace(&self, organization_id: &str, workspace: OrganizationWorkspace) {
        let mut inner = self.inner.write().await;
        inner
            .members
            .entry(organization_id.to_string())
            .or_default()
            .workspaces
            .push(workspace);
    }

    pub async fn insert_group(&self, organization_id: &str, group: OrganizationGroup) {
        let mut inner = self.inner.write().await;
        inner
            .members
            .entry(organization_id.to_string())
            .or_default()
            .groups
            .push(group);
    }
}

fn page_of<T: Clone>(
    records: &[T],
    pagination: Pagination,
    collection: &str,
) -> RepositoryResult<Page<T>> {
    if records.is_empty() {
        return Err(RepositoryError::empty_data(
            RepositoryOperation::FetchPage,
            collection,
        ));
    }

    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
    let items = records.iter().skip(offset).take(limit).cloned().collect();

    Ok(Page::new(items, records.len() as u64))
}

impl Inner {
    fn require_organization(&self, id: &str) -> RepositoryResult<()> {
        if self.organizations.iter().any(|org| org.id == id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found("Organization", id)
                .with_operation(RepositoryOperation::FetchPage))
        }
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn fetch_organization(&self, id: &str) -> RepositoryResult<Organization> {
        let inner = self.inner.read().await;
        inner
            .organizations
            .iter()
            .find(|org| org.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Organization", id))
    }

    async fn fetch_organization_count(&self) -> RepositoryResult<u64> {
        Ok(self.inner.read().await.organizations.len() as u64)
    }

    async fn fetch_organizations(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Organization>> {
        let inner = self.inner.read().await;
        page_of(&inner.organizations, pagination, "organization")
    }

    async fn fetch_organization_users(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationUser>> {
        let inner = self.inner.read().await;
        inner.require_organization(organization_id)?;
        let users = inner
            .members
            .get(organization_id)
            .map(|m| m.users.as_slice())
            .unwrap_or_default();
        page_of(users, pagination, "user")
    }

    async fn fetch_organization_workspaces(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationWorkspace>> {
        let inner = self.inner.read().await;
        inner.require_organization(organization_id)?;
        let workspaces = inner
            .members
            .get(organization_id)
            .map(|m| m.workspaces.as_slice())
            .unwrap_or_default();
        page_of(workspaces, pagination, "workspace")
    }

    async fn fetch_organization_groups(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationGroup>> {
        let inner = self.inner.read().await;
        inner.require_organization(organization_id)?;
        let groups = inner
            .members
            .get(organization_id)
            .map(|m| m.groups.as_slice())
            .unwrap_or_default();
        page_of(groups, pagination, "group")
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
