//! Entity extraction endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::Entity;
use crate::state::AppState;

/// Body of `POST /v3/entities`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitiesRequest {
    pub language: String,
    pub text: String,
}

/// `POST /v3/entities`
pub async fn extract_entities(
    State(state): State<AppState>,
    body: std::result::Result<Json<EntitiesRequest>, JsonRejection>,
) -> Result<Json<Vec<Entity>>> {
    let Json(request) = body.map_err(|rejection| Error::BadRequest(rejection.body_text()))?;

    let extractor = state.extractors().get(&request.language).ok_or_else(|| {
        Error::BadRequest(format!("Unsupported language '{}'", request.language))
    })?;

    let entities = extractor.extract(&request.text).await?;
    tracing::debug!(
        language = %request.language,
        entities = entities.len(),
        "Extracted entities"
    );
    Ok(Json(entities))
}
