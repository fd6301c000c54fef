//! Canonical store abstraction
//!
//! The handlers only see [`OrganizationRepository`]. Two implementations ship
//! with the service:
//!
//! - [`memory::InMemoryOrganizationRepository`] for local development and tests
//! - [`postgres::PgOrganizationRepository`] behind the `postgres` feature
//!
//! Both report failures as [`RepositoryError`], which the handler layer turns
//! into response outcomes.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use console_service::repository::{
//!     memory::InMemoryOrganizationRepository, OrganizationRepository, Pagination,
//! };
//!
//! let repo: Arc<dyn OrganizationRepository> = Arc::new(InMemoryOrganizationRepository::new());
//! let page = repo.fetch_organizations(Pagination::default()).await?;
//! println!("{} of {}", page.items.len(), page.total);
//! ```

mod error;
mod pagination;
mod traits;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use pagination::{Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use traits::{OrganizationRepository, Page, RepositoryResult};
