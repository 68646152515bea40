//! Provider traits and request/response types

use crate::config::ProviderConfig;
use crate::results::{ProviderError, SearchOutput};
use async_trait::async_trait;
use std::collections::HashMap;

/// Anything the fallback router can ask for an answer.
///
/// Implementations report every failure through [`ProviderError`]; the
/// router decides what to do with it.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name, used in logs and metrics
    fn name(&self) -> &str;

    /// Provider metadata
    fn about(&self) -> EngineAbout {
        EngineAbout::default()
    }

    /// Run one search
    async fn search(&self, query: &str) -> Result<SearchOutput, ProviderError>;
}

/// HTTP request to be made by an engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// POST body data
    pub data: Option<RequestBody>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: HashMap::new(),
            data: None,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add form data
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(RequestBody::Form(data));
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.data = Some(RequestBody::Json(data));
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Form(HashMap<String, String>),
    Json(serde_json::Value),
}

/// HTTP response from an engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl EngineResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response indicates CAPTCHA
    pub fn is_captcha(&self) -> bool {
        self.text.contains("captcha")
            || self.text.contains("CAPTCHA")
            || self.text.contains("unusual traffic")
            || self.text.contains("automated requests")
    }

    /// Map a non-2xx status onto the matching provider error
    pub fn error_for_status(&self) -> Result<(), ProviderError> {
        match self.status {
            429 => Err(ProviderError::RateLimited),
            401 | 403 => Err(ProviderError::Unauthorized(self.status)),
            _ if !self.is_success() => Err(ProviderError::Http(self.status)),
            _ => Ok(()),
        }
    }
}

/// An HTTP-backed search backend, split into request building and response
/// parsing so that both halves can be tested without a network.
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Short description of the engine
    fn about(&self) -> EngineAbout {
        EngineAbout::default()
    }

    /// Build the HTTP request for a search
    fn request(&self, query: &str) -> Result<EngineRequest, ProviderError>;

    /// Parse the HTTP response into the engine's native output
    fn response(&self, response: EngineResponse) -> Result<SearchOutput, ProviderError>;

    /// Apply configuration (called once on startup)
    fn init(&mut self, _config: &ProviderConfig) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Engine metadata
#[derive(Debug, Clone, Default)]
pub struct EngineAbout {
    /// Website URL
    pub website: Option<String>,
    /// Whether it uses the official API
    pub use_official_api: bool,
    /// Whether an API key is required
    pub require_api_key: bool,
    /// Result format (HTML, JSON)
    pub results: String,
}

impl EngineAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }

    pub fn results_format(mut self, format: impl Into<String>) -> Self {
        self.results = format.into();
        self
    }
}

/// Return the configured API key, or fail fast naming the variable to set
pub(crate) fn require_key<'a>(
    key: &'a Option<String>,
    env_var: &str,
) -> Result<&'a str, ProviderError> {
    key.as_deref()
        .ok_or_else(|| ProviderError::MissingCredential(env_var.to_string()))
}
