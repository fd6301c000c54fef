//! Query-string parameters for the organization routes
//!
//! One flat struct per operation. Page and size are accepted as signed
//! integers so that `0` and negative values reach validation and are rejected
//! with a 422 instead of failing deserialization.
//!
//! # Example
//!
//! ```rust
//! use console_service::handlers::OrganizationListParams;
//!
//! let params = OrganizationListParams { page: Some(3), size: Some(20) };
//! let pagination = params.pagination().unwrap();
//! assert_eq!(pagination.offset(), 40);
//!
//! let params = OrganizationListParams { page: None, size: Some(0) };
//! assert!(params.pagination().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::repository::{Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

fn positive(name: &str, value: Option<i64>, default: u32) -> Result<u32, Error> {
    match value {
        None => Ok(default),
        Some(v) if v < 1 => Err(Error::ValidationError(format!(
            "{} must be greater than or equal to 1",
            name
        ))),
        Some(v) => u32::try_from(v).map_err(|_| {
            Error::ValidationError(format!("{} must be at most {}", name, u32::MAX))
        }),
    }
}

/// Validate optional page/size values into a [`Pagination`]
pub fn pagination_from(page: Option<i64>, size: Option<i64>) -> Result<Pagination, Error> {
    let page = positive("page", page, DEFAULT_PAGE)?;
    let size = positive("size", size, DEFAULT_PAGE_SIZE)?;
    Pagination::new(page, size)
        .ok_or_else(|| Error::ValidationError("page and size must be positive".to_string()))
}

/// Parameters for fetching one organization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationParams {
    pub id: String,
}

/// Parameters for listing all organizations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationListParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
}

impl OrganizationListParams {
    pub fn pagination(&self) -> Result<Pagination, Error> {
        pagination_from(self.page, self.size)
    }
}

/// Parameters for searching organizations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationSearchParams {
    /// Free-text query; absent means the empty query
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
}

impl OrganizationSearchParams {
    pub fn pagination(&self) -> Result<Pagination, Error> {
        pagination_from(self.page, self.size)
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

/// Parameters for listing the users, workspaces or groups of an organization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationMemberListParams {
    pub id: String,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
}

impl OrganizationMemberListParams {
    pub fn pagination(&self) -> Result<Pagination, Error> {
        pagination_from(self.page, self.size)
    }
}
