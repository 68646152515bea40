//! Serper provider (Google results through serper.dev, requires a key)

use super::text::clean_snippet;
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{ProviderError, SearchOutput};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_KEY_ENV: &str = "SERPER_API_KEY";

/// Serper Google search. Prefers the answer box, else organic snippets.
pub struct Serper {
    base_url: String,
    api_key: Option<String>,
    key_env: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<Organic>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Organic {
    #[serde(default)]
    snippet: String,
}

impl Serper {
    pub fn new() -> Self {
        Self {
            base_url: "https://google.serper.dev/search".to_string(),
            api_key: None,
            key_env: DEFAULT_KEY_ENV.to_string(),
            max_results: 3,
        }
    }
}

impl Default for Serper {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Serper {
    fn name(&self) -> &str {
        "serper"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://serper.dev")
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
            .header("X-API-KEY", key)
            .json(json!({ "q": query, "num": self.max_results })))
    }

    fn response(&self, response: EngineResponse) -> Result<SearchOutput, ProviderError> {
        response.error_for_status()?;

        let body: ApiResponse = response.json()?;
        let boxed = body
            .answer_box
            .and_then(|b| b.answer.or(b.snippet))
            .map(|a| clean_snippet(&a))
            .filter(|a| !a.is_empty());
        if let Some(answer) = boxed {
            return Ok(SearchOutput::Text(answer));
        }

        let snippets: Vec<String> = body
            .organic
            .into_iter()
            .map(|o| clean_snippet(&o.snippet))
            .filter(|s| !s.is_empty())
            .take(self.max_results)
            .collect();

        if snippets.is_empty() {
            return Err(ProviderError::EmptyResults);
        }
        Ok(SearchOutput::List(snippets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use crate::providers::{HttpProvider, SearchProvider};
    use std::collections::HashMap;
    use std::sync::Arc;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response(status: u16, body: serde_json::Value) -> EngineResponse {
        EngineResponse {
            status,
            headers: HashMap::new(),
            text: body.to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let err = Serper::new().request("rust").unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(ref v) if v == "SERPER_API_KEY"));
    }

    #[test]
    fn test_answer_box() {
        let output = Serper::new()
            .response(response(
                200,
                json!({
                    "answerBox": { "answer": "1.78" },
                    "organic": [{ "snippet": "ignored" }]
                }),
            ))
            .unwrap();
        assert_eq!(output, SearchOutput::from("1.78"));
    }

    #[test]
    fn test_organic_snippets() {
        let output = Serper::new()
            .response(response(
                200,
                json!({
                    "organic": [
                        { "title": "a", "snippet": "one" },
                        { "title": "b", "snippet": "two" },
                        { "title": "c", "snippet": "three" },
                        { "title": "d", "snippet": "four" }
                    ]
                }),
            ))
            .unwrap();
        assert_eq!(output.into_texts(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_forbidden_is_unauthorized() {
        let err = Serper::new()
            .response(response(403, json!({ "message": "bad key" })))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unauthorized(403)));
    }

    #[tokio::test]
    async fn test_search_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("X-API-KEY", "serper-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [{ "snippet": "Rust is fast" }]
            })))
            .mount(&server)
            .await;

        let mut serper = Serper::new();
        serper
            .init(
                &ProviderConfig::named("serper")
                    .with_api_key("serper-key")
                    .with_base_url(server.uri()),
            )
            .unwrap();

        let provider = HttpProvider::new(Arc::new(serper), HttpClient::new().unwrap());
        assert_eq!(
            provider.search("rust").await.unwrap(),
            SearchOutput::List(vec!["Rust is fast".to_string()])
        );
    }
}
