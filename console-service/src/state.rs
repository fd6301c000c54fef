//! Application state shared across handlers

use std::sync::Arc;

use crate::{config::Config, handlers::OrganizationHandler, language::ModelRegistry};

/// State injected into every route
///
/// All collaborators are constructed by the caller (normally `main`) and
/// passed in; nothing here reaches for globals.
#[derive(Clone, Debug)]
pub struct AppState {
    config: Arc<Config>,
    organizations: Arc<OrganizationHandler>,
    extractors: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(config: Config, organizations: OrganizationHandler, extractors: ModelRegistry) -> Self {
        Self {
            config: Arc::new(config),
            organizations: Arc::new(organizations),
            extractors: Arc::new(extractors),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn organizations(&self) -> &OrganizationHandler {
        &self.organizations
    }

    pub fn extractors(&self) -> &ModelRegistry {
        &self.extractors
    }
}
