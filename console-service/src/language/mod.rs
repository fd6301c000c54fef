//! Named-entity extraction
//!
//! Each supported language maps to an [`EntityExtractor`]. The registry is
//! built once at startup from `language.models` and injected into the router
//! state; there is no process-wide model table.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LanguageConfig;
use crate::error::{Error, Result};

/// An entity found in a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The matched span
    pub text: String,
    /// Entity label, e.g. `PERSON` or `ORG`
    pub label: String,
}

/// Extracts entities from text in one language
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Extractor backed by an NLP model served over HTTP
///
/// Posts `{"text": ...}` to the model endpoint and expects a JSON array of
/// `{text, label}` objects back.
#[derive(Debug, Clone)]
pub struct HttpEntityExtractor {
    client: reqwest::Client,
    url: String,
}

impl HttpEntityExtractor {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

#[async_trait]
impl EntityExtractor for HttpEntityExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        let response = self
            .client
            .post(&self.url)
            .json(&ExtractRequest { text })
            .send()
            .await
            .map_err(|e| Error::External(format!("Entity model at {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::External(format!(
                "Entity model at {} returned {}",
                self.url,
                response.status()
            )));
        }

        response
            .json::<Vec<Entity>>()
            .await
            .map_err(|e| Error::External(format!("Invalid entity model response: {}", e)))
    }
}

/// Extractors keyed by language code
#[derive(Clone, Default)]
pub struct ModelRegistry {
    extractors: HashMap<String, Arc<dyn EntityExtractor>>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build HTTP extractors for every configured language
    pub fn from_config(config: &LanguageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build entity model client: {}", e)))?;

        let mut registry = Self::new();
        for (language, url) in &config.models {
            tracing::info!(language = %language, url = %url, "Registered entity model");
            registry.insert(
                language.clone(),
                Arc::new(HttpEntityExtractor::new(client.clone(), url.clone())),
            );
        }
        Ok(registry)
    }

    /// Register or replace the extractor for a language
    pub fn insert(&mut self, language: impl Into<String>, extractor: Arc<dyn EntityExtractor>) {
        self.extractors.insert(language.into(), extractor);
    }

    #[must_use]
    pub fn with(mut self, language: impl Into<String>, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.insert(language, extractor);
        self
    }

    pub fn get(&self, language: &str) -> Option<Arc<dyn EntityExtractor>> {
        self.extractors.get(language).cloned()
    }

    /// Registered language codes, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}
