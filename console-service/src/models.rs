//! Canonical records served by the console API
//!
//! These are read-only copies of rows owned by the store. They serialize with
//! the camelCase field names the console front-end expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// A user holding a permission on an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUser {
    pub id: String,
    pub username: String,
    pub picture: Option<String>,
    pub permission: String,
    pub create_time: DateTime<Utc>,
}

/// A workspace belonging to an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationWorkspace {
    pub id: String,
    pub name: String,
    pub create_time: DateTime<Utc>,
}

/// A group belonging to an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationGroup {
    pub id: String,
    pub name: String,
    pub create_time: DateTime<Utc>,
}
