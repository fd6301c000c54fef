//! PostgreSQL repository
//!
//! Reads the console tables directly with runtime-checked queries. Member
//! listings first confirm the parent organization exists so an unknown ID
//! surfaces as `NotFound` rather than an empty page.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::traits::{OrganizationRepository, Page, RepositoryResult};
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::models::{Organization, OrganizationGroup, OrganizationUser, OrganizationWorkspace};

/// Open a connection pool, retrying with exponential backoff
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(&config.url)
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(
                    max = config.max_connections,
                    min = config.min_connections,
                    attempts = attempt + 1,
                    "Database connection pool created"
                );
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;
                if attempt > config.max_retries {
                    tracing::error!(
                        url = %sanitize_connection_url(&config.url),
                        attempts = attempt,
                        error = %e,
                        "Failed to connect to database"
                    );
                    return Err(Error::Internal(format!(
                        "Failed to connect to database at '{}': {}",
                        sanitize_connection_url(&config.url),
                        e
                    )));
                }

                let delay = base_delay * 2_u32.pow(attempt.saturating_sub(1));
                tracing::warn!(
                    attempt,
                    error = %e,
                    "Database connection failed, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Mask the password in a connection URL for logging
fn sanitize_connection_url(url: &str) -> String {
    let (Some(scheme_end), Some(at_pos)) = (url.find("://"), url.rfind('@')) else {
        return url.to_string();
    };
    let credentials = &url[scheme_end + 3..at_pos];
    match credentials.split_once(':') {
        Some((username, _)) => format!(
            "{}{}:***{}",
            &url[..scheme_end + 3],
            username,
            &url[at_pos..]
        ),
        None => url.to_string(),
    }
}

/// Repository over the console's PostgreSQL schema
#[derive(Debug, Clone)]
pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn organization_exists(&self, id: &str) -> RepositoryResult<()> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM organization WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FetchPage))?;

        match found {
            Some(_) => Ok(()),
            None => Err(RepositoryError::not_found("Organization", id)
                .with_operation(RepositoryOperation::FetchPage)),
        }
    }

    async fn count(&self, sql: &str, organization_id: Option<&str>) -> RepositoryResult<u64> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        if let Some(id) = organization_id {
            query = query.bind(id);
        }
        let total = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FetchCount))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

fn bounds(pagination: Pagination) -> (i64, i64) {
    (
        i64::try_from(pagination.limit()).unwrap_or(i64::MAX),
        i64::try_from(pagination.offset()).unwrap_or(i64::MAX),
    )
}

fn page_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::from(e).with_operation(RepositoryOperation::FetchPage)
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn fetch_organization(&self, id: &str) -> RepositoryResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "SELECT id, name, create_time, update_time FROM organization WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FetchById))?
        .ok_or_else(|| RepositoryError::not_found("Organization", id))
    }

    async fn fetch_organization_count(&self) -> RepositoryResult<u64> {
        self.count("SELECT COUNT(*) FROM organization", None).await
    }

    async fn fetch_organizations(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Organization>> {
        let total = self.count("SELECT COUNT(*) FROM organization", None).await?;
        if total == 0 {
            return Err(RepositoryError::empty_data(
                RepositoryOperation::FetchPage,
                "organization",
            ));
        }

        let (limit, offset) = bounds(pagination);
        let items = sqlx::query_as::<_, Organization>(
            "SELECT id, name, create_time, update_time FROM organization \
             ORDER BY create_time, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(page_error)?;

        Ok(Page::new(items, total))
    }

    async fn fetch_organization_users(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationUser>> {
        self.organization_exists(organization_id).await?;
        let total = self
            .count(
                "SELECT COUNT(*) FROM userpermission WHERE resource_id = $1",
                Some(organization_id),
            )
            .await?;
        if total == 0 {
            return Err(RepositoryError::empty_data(
                RepositoryOperation::FetchPage,
                "user",
            ));
        }

        let (limit, offset) = bounds(pagination);
        let items = sqlx::query_as::<_, OrganizationUser>(
            "SELECT u.id, u.username, u.picture, p.permission, p.create_time \
             FROM userpermission p JOIN \"user\" u ON u.id = p.user_id \
             WHERE p.resource_id = $1 \
             ORDER BY p.create_time, u.id LIMIT $2 OFFSET $3",
        )
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(page_error)?;

        Ok(Page::new(items, total))
    }

    async fn fetch_organization_workspaces(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationWorkspace>> {
        self.organization_exists(organization_id).await?;
        let total = self
            .count(
                "SELECT COUNT(*) FROM workspace WHERE organization_id = $1",
                Some(organization_id),
            )
            .await?;
        if total == 0 {
            return Err(RepositoryError::empty_data(
                RepositoryOperation::FetchPage,
                "workspace",
            ));
        }

        let (limit, offset) = bounds(pagination);
        let items = sqlx::query_as::<_, OrganizationWorkspace>(
            "SELECT id, name, create_time FROM workspace \
             WHERE organization_id = $1 \
             ORDER BY create_time, id LIMIT $2 OFFSET $3",
        )
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(page_error)?;

        Ok(Page::new(items, total))
    }

    async fn fetch_organization_groups(
        &self,
        organization_id: &str,
        pagination: Pagination,
    ) -> RepositoryResult<Page<OrganizationGroup>> {
        self.organization_exists(organization_id).await?;
        let total = self
            .count(
                "SELECT COUNT(*) FROM \"group\" WHERE organization_id = $1",
                Some(organization_id),
            )
            .await?;
        if total == 0 {
            return Err(RepositoryError::empty_data(
                RepositoryOperation::FetchPage,
                "group",
            ));
        }

        let (limit, offset) = bounds(pagination);
        let items = sqlx::query_as::<_, OrganizationGroup>(
            "SELECT id, name, create_time FROM \"group\" \
             WHERE organization_id = $1 \
             ORDER BY create_time, id LIMIT $2 OFFSET $3",
        )
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(page_error)?;

        Ok(Page::new(items, total))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::HealthCheck))
    }
}
