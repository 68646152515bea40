//! Wikipedia provider (MediaWiki search API, no key)

use super::text::clean_snippet;
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{ProviderError, SearchOutput};
use serde::Deserialize;

/// Wikipedia full-text search, answering with `Title: snippet` lines
pub struct Wikipedia {
    api_url: String,
    lang: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<ApiQuery>,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    search: Vec<ApiHit>,
}

#[derive(Debug, Deserialize)]
struct ApiHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

impl Wikipedia {
    pub fn new() -> Self {
        Self {
            api_url: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            lang: "en".to_string(),
            max_results: 3,
        }
    }

    fn get_api_url(&self) -> String {
        // Base language code only ("en" from "en-US")
        let lang = self.lang.split('-').next().unwrap_or("en");
        self.api_url.replace("{lang}", lang)
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Wikipedia {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://www.wikipedia.org")
            .official_api(true)
            .results_format("JSON")
    }

    fn init(&mut self, config: &ProviderConfig) -> Result<(), ProviderError> {
        if let Some(ref url) = config.base_url {
            self.api_url = url.clone();
        }
        if let Some(ref lang) = config.language {
            self.lang = lang.clone();
        }
        self.max_results = config.max_results.max(1);
        Ok(())
    }

    fn request(&self, query: &str) -> Result<EngineRequest, ProviderError> {
        Ok(EngineRequest::get(self.get_api_url())
            .header("Accept", "application/json")
            .param("action", "query")
            .param("list", "search")
            .param("format", "json")
            .param("utf8", "1")
            .param("srsearch", query)
            .param("srlimit", self.max_results.to_string()))
    }

    fn response(&self, response: EngineResponse) -> Result<SearchOutput, ProviderError> {
        response.error_for_status()?;

        let body: ApiResponse = response.json()?;
        let hits = body.query.map(|q| q.search).unwrap_or_default();

        let lines: Vec<String> = hits
            .into_iter()
            .take(self.max_results)
            .map(|hit| {
                let snippet = clean_snippet(&hit.snippet);
                if snippet.is_empty() {
                    hit.title
                } else {
                    format!("{}: {}", hit.title, snippet)
                }
            })
            .collect();

        if lines.is_empty() {
            return Err(ProviderError::EmptyResults);
        }
        Ok(SearchOutput::List(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HttpClient;
    use crate::providers::{HttpProvider, SearchProvider};
    use std::collections::HashMap;
    use std::sync::Arc;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hits() -> serde_json::Value {
        serde_json::json!({
            "batchcomplete": "",
            "query": {
                "searchinfo": { "totalhits": 2 },
                "search": [
                    {
                        "title": "Rust (programming language)",
                        "snippet": "<span class=\"searchmatch\">Rust</span> is a general-purpose language"
                    },
                    { "title": "Rust", "snippet": "" }
                ]
            }
        })
    }

    #[test]
    fn test_wikipedia_request() {
        let wiki = Wikipedia::new();
        let request = wiki.request("rust programming").unwrap();

        assert!(request.url.contains("en.wikipedia.org"));
        assert_eq!(request.params["srsearch"], "rust programming");
        assert_eq!(request.params["list"], "search");
    }

    #[test]
    fn test_configured_language() {
        let mut wiki = Wikipedia::new();
        wiki.init(&ProviderConfig {
            language: Some("de-CH".to_string()),
            ..ProviderConfig::named("wikipedia")
        })
        .unwrap();

        let request = wiki.request("rust").unwrap();
        assert_eq!(request.url, "https://de.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_parse_hits() {
        let wiki = Wikipedia::new();
        let output = wiki
            .response(EngineResponse {
                status: 200,
                headers: HashMap::new(),
                text: hits().to_string(),
                url: String::new(),
            })
            .unwrap();

        assert_eq!(
            output,
            SearchOutput::List(vec![
                "Rust (programming language): Rust is a general-purpose language".to_string(),
                "Rust".to_string(),
            ])
        );
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let wiki = Wikipedia::new();
        let err = wiki
            .response(EngineResponse {
                status: 200,
                headers: HashMap::new(),
                text: "<html>not json</html>".to_string(),
                url: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[tokio::test]
    async fn test_search_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("srsearch", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hits()))
            .mount(&server)
            .await;

        let mut wiki = Wikipedia::new();
        wiki.init(&ProviderConfig::named("wikipedia").with_base_url(server.uri()))
            .unwrap();

        let provider = HttpProvider::new(Arc::new(wiki), HttpClient::new().unwrap());
        let output = provider.search("rust").await.unwrap();
        assert_eq!(output.into_texts().len(), 2);
    }
}
