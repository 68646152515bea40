//! Brave Search provider (web search API, requires a subscription token)

use super::text::clean_snippet;
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{ProviderError, SearchOutput};
use serde::Deserialize;

const DEFAULT_KEY_ENV: &str = "BRAVE_API_KEY";

/// Brave web search API
pub struct Brave {
    base_url: String,
    api_key: Option<String>,
    key_env: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl Brave {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.search.brave.com/res/v1/web/search".to_string(),
            api_key: None,
            key_env: DEFAULT_KEY_ENV.to_string(),
            max_results: 3,
        }
    }
}

impl Default for Brave {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://search.brave.com")
            .official_api(true)
            .api_key_required(true)
            .results_format("JSON")
    }

    fn init(&mut self, config: &ProviderConfig) -> Result<(), ProviderError> {
        if let Some(ref url) = config.base_url {
            self.base_url = url.clone();
        }
        if let Some(var) = config.key_env() {
            self.key_env = var.to_string();
        }
        self.api_key = config.api_key.clone();
        self.max_results = config.max_results.max(1);
        Ok(())
    }

    fn request(&self, query: &str) -> Result<EngineRequest, ProviderError> {
        let key = require_key(&self.api_key, &self.key_env)?;

        Ok(EngineRequest::get(&self.base_url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", key)
            .param("q", query)
            .param("count", self.max_results.to_string()))
    }

    fn response(&self, response: EngineResponse) -> Result<SearchOutput, ProviderError> {
        response.error_for_status()?;

        let body: ApiResponse = response.json()?;
        let descriptions: Vec<String> = body
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                let description = clean_snippet(&r.description);
                if description.is_empty() {
                    clean_snippet(&r.title)
                } else {
                    description
                }
            })
            .filter(|d| !d.is_empty())
            .take(self.max_results)
            .collect();

        if descriptions.is_empty() {
            return Err(ProviderError::EmptyResults);
        }
        Ok(SearchOutput::List(descriptions))
    }
}
