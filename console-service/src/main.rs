use std::sync::Arc;

use console_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let repository = build_repository(&config).await?;
    let search = Arc::new(MeilisearchIndex::new(&config.search)?);
    let organizations =
        OrganizationHandler::new(repository, search, SearchSettings::from(&config.search));

    let extractors = ModelRegistry::from_config(&config.language)?;
    if extractors.is_empty() {
        tracing::warn!("No entity models configured, /v3/entities will reject every language");
    }

    let jwt = JwtAuth::new(&config.jwt)?;
    let state = AppState::new(config.clone(), organizations, extractors);
    let app = build_router(state, jwt);

    Server::new(config).serve(app).await?;

    shutdown_tracing();
    Ok(())
}

#[cfg(feature = "postgres")]
async fn build_repository(config: &Config) -> Result<Arc<dyn OrganizationRepository>> {
    match &config.database {
        Some(database) => {
            let pool = console_service::repository::postgres::connect(database).await?;
            Ok(Arc::new(PgOrganizationRepository::new(pool)))
        }
        None => Ok(in_memory()),
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_repository(config: &Config) -> Result<Arc<dyn OrganizationRepository>> {
    if config.database.is_some() {
        tracing::warn!("[database] is configured but the postgres feature is disabled");
    }
    Ok(in_memory())
}

fn in_memory() -> Arc<dyn OrganizationRepository> {
    tracing::warn!("No database configured, serving from an empty in-memory store");
    Arc::new(InMemoryOrganizationRepository::new())
}
