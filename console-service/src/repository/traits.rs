//! Repository trait definitions
//!
//! The handlers hold repositories as `Arc<dyn OrganizationRepository>`, so the
//! trait is object safe via `async_trait` rather than RPITIT.
//!
//! # Contract
//!
//! - `fetch_organization` fails with `NotFound` for an unknown ID.
//! - List operations fail with `EmptyData` when the collection holds no
//!   records at all. A page past the end is not an error: it returns an empty
//!   `items` list with the real `total`.
//! - Member listings (`users`, `workspaces`, `groups`) fail with `NotFound`
//!   when the parent organization does not exist.

use async_trait::async_trait;

use super::error::RepositoryError;
use super::pagination::Pagination;
use crate::models::{Organization, OrganizationGroup, OrganizationUser, OrganizationWorkspace};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// One page of records plus the size of the whole collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on the requested page, in store order
    pub items: Vec<T>,
    /// Total records across all pages
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Canonical store for organizations and their members
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Fetch one organization by ID
    async fn fetch_organization(&self, id: &str) -> RepositoryResult<Organization>;

    /// Count all organizations
    async fn fetch_organization_count(&self) -> RepositoryResult<u64>;

    /// Fetch one page of organizations
    async fn fetch_organizations(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Organization>>;

    /// Fetch one page of the users of an organization
    async fn fetch_organization_users(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationUser>>;

    /// Fetch one page of the workspaces of an organization
    async fn fetch_organization_workspaces(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationWorkspace>>;

    /// Fetch one page of the groups of an organization
    async fn fetch_organization_groups(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationGroup>>;

    /// Check that the store is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}
