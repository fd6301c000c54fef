//! Handler outcome classification
//!
//! Every collaborator failure seen by an organization handler is reduced to
//! one of three outcomes, first match wins:
//!
//! | Repository kind | Outcome      | HTTP |
//! |-----------------|--------------|------|
//! | `NotFound`      | `NOT_FOUND`  | 404  |
//! | `EmptyData`     | `NO_CONTENT` | 204  |
//! | anything else   | `UNKNOWN`    | 500  |
//!
//! `UNKNOWN` never carries the collaborator's message to the caller. The
//! original detail is kept on the error for logging only.
//!
//! # Example
//!
//! ```rust
//! use console_service::handlers::{ApiError, ApiErrorKind, ApiOperation};
//! use console_service::repository::RepositoryError;
//!
//! let error = ApiError::classify(
//!     ApiOperation::Get,
//!     RepositoryError::not_found("Organization", "org_123"),
//! );
//! assert_eq!(error.kind, ApiErrorKind::NotFound);
//! assert!(error.message.contains("org_123"));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Handler operation during which the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Fetching one organization
    Get,
    /// Counting organizations
    Count,
    /// Listing all organizations
    List,
    /// Searching organizations
    Search,
    /// Listing the users of an organization
    ListUsers,
    /// Listing the workspaces of an organization
    ListWorkspaces,
    /// Listing the groups of an organization
    ListGroups,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Count => write!(f, "count"),
            Self::List => write!(f, "list"),
            Self::Search => write!(f, "search"),
            Self::ListUsers => write!(f, "list_users"),
            Self::ListWorkspaces => write!(f, "list_workspaces"),
            Self::ListGroups => write!(f, "list_groups"),
        }
    }
}

/// Outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The requested record does not exist
    NotFound,
    /// The requested collection holds no records
    NoContent,
    /// Any other failure
    Unknown,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::NoContent => write!(f, "no_content"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this outcome
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NoContent => StatusCode::NO_CONTENT,
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this outcome
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }

    const fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound => "The requested item could not be found.",
            Self::NoContent => "There is nothing to show here yet.",
            Self::Unknown => "Something went wrong. Please try again later.",
        }
    }

    const fn more_info(&self) -> &'static str {
        match self {
            Self::NotFound => "Check the identifier; the record may have been deleted.",
            Self::NoContent => "The collection exists but holds no records.",
            Self::Unknown => "The failure was logged under the response's x-request-id.",
        }
    }
}

const NO_CONTENT_MESSAGE: &str = "No content";
const UNKNOWN_MESSAGE: &str = "An unknown error occurred";

/// Classified handler error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The outcome category
    pub kind: ApiErrorKind,
    /// Message returned to the caller
    pub message: String,
    /// The type of record involved
    pub entity_type: Option<String>,
    /// The ID of the record involved
    pub entity_id: Option<String>,
    // Collaborator detail for logs, never serialized
    detail: Option<String>,
}

impl ApiError {
    /// Reduce a collaborator failure to a handler outcome
    pub fn classify(operation: ApiOperation, err: RepositoryError) -> Self {
        let (kind, message, detail) = match err.kind {
            RepositoryErrorKind::NotFound => (ApiErrorKind::NotFound, err.message, None),
            RepositoryErrorKind::EmptyData => (
                ApiErrorKind::NoContent,
                NO_CONTENT_MESSAGE.to_string(),
                Some(err.message),
            ),
            _ => (
                ApiErrorKind::Unknown,
                UNKNOWN_MESSAGE.to_string(),
                Some(format!(
                    "{} error during {}: {}",
                    err.kind, err.operation, err.message
                )),
            ),
        };

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            detail,
        }
    }

    /// Build the wire envelope for this outcome
    #[must_use]
    pub fn envelope(&self) -> ApiErrorEnvelope {
        ApiErrorEnvelope {
            code: self.kind.error_code(),
            status: self.kind.status_code().as_u16(),
            message: self.message.clone(),
            user_message: self.kind.user_message().to_string(),
            more_info: self.kind.more_info().to_string(),
            data: match self.kind {
                ApiErrorKind::NoContent => Some(Vec::new()),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Error envelope returned to the console
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorEnvelope {
    pub code: String,
    pub status: u16,
    pub message: String,
    pub user_message: String,
    pub more_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<serde_json::Value>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        match self.kind {
            ApiErrorKind::Unknown => tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                detail = self.detail.as_deref().unwrap_or_default(),
                "API error: {}", self.message
            ),
            ApiErrorKind::NotFound | ApiErrorKind::NoContent => tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                detail = self.detail.as_deref().unwrap_or_default(),
                "API error: {}", self.message
            ),
        }

        // 204 responses must not carry a body
        if self.kind == ApiErrorKind::NoContent {
            return status.into_response();
        }

        (status, Json(self.envelope())).into_response()
    }
}
