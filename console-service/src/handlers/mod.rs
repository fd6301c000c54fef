//! HTTP handlers
//!
//! The organization handlers share one pipeline:
//!
//! 1. Validate query parameters into a [`Pagination`](crate::repository::Pagination)
//! 2. Call the store (and, for search, the search index followed by
//!    [`reconcile`](reconcile::reconcile))
//! 3. Wrap the result with [`paginate`] into a [`PageEnvelope`], or classify
//!    the failure into an [`ApiError`]

mod error;
mod query;
mod response;

pub mod entities;
pub mod organization;
pub mod reconcile;

pub use error::{ApiError, ApiErrorEnvelope, ApiErrorKind, ApiOperation};
pub use organization::{OrganizationHandler, SearchSettings};
pub use query::{
    pagination_from, OrganizationListParams, OrganizationMemberListParams, OrganizationParams,
    OrganizationSearchParams,
};
pub use response::{paginate, CountResponse, PageEnvelope, PageMeta};
