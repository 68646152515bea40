//! Tavily provider (search API built for agents, requires a key)

use super::text::clean_snippet;
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{ProviderError, SearchOutput};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_KEY_ENV: &str = "TAVILY_API_KEY";

/// Tavily search. Prefers the generated answer, else the result contents.
pub struct Tavily {
    base_url: String,
    api_key: Option<String>,
    key_env: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    #[serde(default)]
    content: String,
}

impl Tavily {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.tavily.com/search".to_string(),
            api_key: None,
            key_env: DEFAULT_KEY_ENV.to_string(),
            max_results: 3,
        }
    }
}

impl Default for Tavily {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Tavily {
    fn name(&self) -> &str {
        "tavily"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://tavily.com")
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

        Ok(EngineRequest::post(&self.base_url)
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", key))
            .json(json!({
                "query": query,
                "max_results": self.max_results,
                "include_answer": true,
                "search_depth": "basic",
            })))
    }

    fn response(&self, response: EngineResponse) -> Result<SearchOutput, ProviderError> {
        response.error_for_status()?;

        let body: ApiResponse = response.json()?;
        if let Some(answer) = body.answer.filter(|a| !a.trim().is_empty()) {
            return Ok(SearchOutput::Text(answer));
        }

        let contents: Vec<String> = body
            .results
            .into_iter()
            .map(|r| clean_snippet(&r.content))
            .filter(|c| !c.is_empty())
            .take(self.max_results)
            .collect();

        if contents.is_empty() {
            return Err(ProviderError::EmptyResults);
        }
        Ok(SearchOutput::List(contents))
    }
}
