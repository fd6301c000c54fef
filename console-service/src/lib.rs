//! # console-service
//!
//! Read API behind the organization console: paginated listings of
//! organizations and their users, workspaces and groups, full-text search
//! reconciled against the canonical store, and per-language entity
//! extraction.
//!
//! ## Features
//!
//! - **Organization routes**: get, count, list, search and member listings
//!   with a uniform page envelope and classified error envelopes
//! - **Search reconciliation**: search hits are re-fetched from the store in
//!   hit order; hits whose record is gone are dropped
//! - **Pluggable collaborators**: PostgreSQL or in-memory store, Meilisearch
//!   index, HTTP entity extractors, all injected as trait objects
//! - **Middleware stack**: JWT auth, request IDs, sensitive header masking,
//!   body limits, timeouts, compression, panic recovery
//! - **Health checks**: liveness and readiness probes
//!
//! ## Example
//!
//! ```rust,no_run
//! use console_service::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let organizations = OrganizationHandler::new(
//!         Arc::new(InMemoryOrganizationRepository::new()),
//!         Arc::new(MeilisearchIndex::new(&config.search)?),
//!         SearchSettings::from(&config.search),
//!     );
//!     let extractors = ModelRegistry::from_config(&config.language)?;
//!     let jwt = JwtAuth::new(&config.jwt)?;
//!
//!     let state = AppState::new(config.clone(), organizations, extractors);
//!     Server::new(config).serve(build_router(state, jwt)).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod language;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod search;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_support;

/// Common imports
pub mod prelude {
    pub use crate::config::{
        Config, DatabaseConfig, JwtConfig, LanguageConfig, SearchConfig, TotalPolicy,
    };
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, OrganizationHandler, PageEnvelope, SearchSettings,
    };
    pub use crate::health::{health, readiness};
    pub use crate::ids::{MakeTypedRequestId, RequestId};
    pub use crate::language::{Entity, EntityExtractor, HttpEntityExtractor, ModelRegistry};
    pub use crate::middleware::{Claims, JwtAuth, TokenValidator};
    pub use crate::models::{
        Organization, OrganizationGroup, OrganizationUser, OrganizationWorkspace,
    };
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::repository::memory::InMemoryOrganizationRepository;
    pub use crate::repository::{
        OrganizationRepository, Page, Pagination, RepositoryError, RepositoryErrorKind,
    };
    pub use crate::routes::build_router;
    pub use crate::search::{MeilisearchIndex, SearchIndex};
    pub use crate::server::Server;
    pub use crate::state::AppState;

    #[cfg(feature = "postgres")]
    pub use crate::repository::postgres::PgOrganizationRepository;
}
