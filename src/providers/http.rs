//! Adapter turning a request/response [`Engine`] into a [`SearchProvider`]

use super::traits::{Engine, EngineAbout, SearchProvider};
use crate::network::HttpClient;
use crate::results::{ProviderError, SearchOutput};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Drives an [`Engine`] with the shared HTTP client
pub struct HttpProvider {
    name: String,
    engine: Arc<dyn Engine>,
    client: HttpClient,
}

impl HttpProvider {
    pub fn new(engine: Arc<dyn Engine>, client: HttpClient) -> Self {
        Self {
            name: engine.name().to_string(),
            engine,
            client,
        }
    }

    /// Register under a configured name instead of the engine's own
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl SearchProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> EngineAbout {
        self.engine.about()
    }

    async fn search(&self, query: &str) -> Result<SearchOutput, ProviderError> {
        let request = self.engine.request(query)?;
        debug!(provider = %self.name, url = %request.url, "Sending provider request");

        let response = self.client.execute(request).await?;
        let output = self.engine.response(response)?;

        if output.is_empty() {
            return Err(ProviderError::EmptyResults);
        }
        Ok(output)
    }
}
