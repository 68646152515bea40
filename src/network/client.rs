//! HTTP client for making requests to search providers

use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::OutgoingSettings;
use crate::providers::{EngineRequest, EngineResponse, HttpMethod, RequestBody};
use crate::results::ProviderError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client shared by all HTTP-backed providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> anyhow::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            user_agent: generate_user_agent(),
        })
    }

    /// Execute an engine request
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse, ProviderError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder.headers(self.headers_for(&request.headers));

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.data {
            req_builder = match body {
                RequestBody::Form(data) => req_builder.form(&data),
                RequestBody::Json(json) => req_builder.json(&json),
            };
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Browser-like defaults, overridden by the engine's own headers
    fn headers_for(&self, custom: &HashMap<String, String>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let defaults = [
            ("user-agent", self.user_agent.clone()),
            ("accept", accept_html().to_string()),
            ("accept-language", accept_language("en")),
            ("dnt", "1".to_string()),
        ];

        for (key, value) in defaults
            .into_iter()
            .chain(custom.iter().map(|(k, v)| (k.as_str(), v.clone())))
        {
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(key.to_ascii_lowercase().as_bytes()),
                HeaderValue::from_str(&value),
            ) else {
                tracing::debug!("Dropping invalid header {}", key);
                continue;
            };
            headers.insert(name, value);
        }

        headers
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse, ProviderError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response.text().await?;

        Ok(EngineResponse {
            status,
            headers,
            text,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_engine_headers_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = EngineRequest::get(format!("{}/search", server.uri()))
            .param("q", "rust")
            .header("Accept", "application/json");

        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text, "{}");
    }
}
