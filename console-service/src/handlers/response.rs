//! Response envelopes for the organization routes
//!
//! # Example
//!
//! ```rust
//! use console_service::handlers::{paginate, PageEnvelope};
//! use console_service::repository::Pagination;
//!
//! let meta = paginate(25, Pagination::new(1, 10).unwrap());
//! assert_eq!(meta.total_pages, 3);
//!
//! let envelope = PageEnvelope::new(vec!["a", "b"], meta);
//! assert_eq!(envelope.total_elements, 25);
//! assert_eq!(envelope.total_pages, Some(3));
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::Pagination;

/// Page metadata computed from a collection size and the requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub total_elements: u64,
    pub total_pages: u64,
    pub page: u32,
    pub size: u32,
}

/// Compute page metadata
///
/// `page` and `size` are echoed as requested, even when the page lies past
/// the end of the collection.
#[must_use]
pub fn paginate(total_elements: u64, pagination: Pagination) -> PageMeta {
    let size = pagination.size().get();
    PageMeta {
        total_elements,
        total_pages: total_elements.div_ceil(u64::from(size)),
        page: pagination.page().get(),
        size,
    }
}

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub total_elements: u64,
    pub total_pages: Option<u64>,
    pub page: u32,
    pub size: u32,
    pub data: Vec<T>,
}

impl<T> PageEnvelope<T> {
    pub fn new(data: Vec<T>, meta: PageMeta) -> Self {
        Self {
            total_elements: meta.total_elements,
            total_pages: Some(meta.total_pages),
            page: meta.page,
            size: meta.size,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for PageEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response for count operations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountResponse {
    pub count: u64,
}

impl IntoResponse for CountResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
