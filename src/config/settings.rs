//! Settings structures for the internet search service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub agent: AgentSettings,
    /// Provider chain, in the order it is tried
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            search: SearchSettings::default(),
            outgoing: OutgoingSettings::default(),
            agent: AgentSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables.
    ///
    /// Provider credentials are resolved here, once, from each provider's
    /// [`ProviderConfig::key_env`]. A key already present in the file wins.
    pub fn merge_env(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Same as [`Settings::merge_env`] with a custom variable source.
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("INTERNET_SEARCH_HOST") {
            self.server.host = val;
        }
        // Hosting platforms hand the port out through PORT
        for key in ["PORT", "INTERNET_SEARCH_PORT"] {
            if let Some(port) = lookup(key).and_then(|v| v.parse().ok()) {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("INTERNET_SEARCH_PUBLIC_URL") {
            self.server.public_url = Some(val);
        }
        if let Some(budget) = lookup("INTERNET_SEARCH_BUDGET").and_then(|v| v.parse().ok()) {
            self.search.budget = budget;
        }

        for provider in &mut self.providers {
            if provider.api_key.is_some() {
                continue;
            }
            if let Some(var) = provider.key_env().map(str::to_string) {
                provider.api_key = lookup(&var).filter(|k| !k.trim().is_empty());
            }
        }
    }

    /// Providers that are not disabled, in chain order
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }

    /// Effective time budget for a provider: its own timeout, else the
    /// default budget, clamped to `max_budget`. Values that do not fit a
    /// `Duration` fall back to `MAX_TIMEOUT`.
    pub fn budget_for(&self, provider: &ProviderConfig) -> Duration {
        let secs = provider
            .timeout
            .unwrap_or(self.search.budget)
            .min(self.search.max_budget)
            .max(0.0);
        Duration::try_from_secs_f64(secs)
            .unwrap_or_else(|_| Duration::from_secs(crate::MAX_TIMEOUT))
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Externally reachable URL advertised in the agent card
    pub public_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 10003,
            public_url: None,
        }
    }
}

impl ServerSettings {
    /// URL advertised to other agents
    pub fn advertised_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}/", self.host, self.port))
    }
}

/// Fallback router settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Per-provider time budget in seconds
    pub budget: f64,
    /// Upper bound for any provider budget
    pub max_budget: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            budget: crate::DEFAULT_TIMEOUT as f64,
            max_budget: crate::MAX_TIMEOUT as f64,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Transport-level request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy for all outgoing requests
    pub proxy: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Agent identity published in the agent card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub name: String,
    pub description: String,
    pub skill_id: String,
    pub skill_name: String,
    pub skill_description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
    pub streaming: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "Internet Agent".to_string(),
            description: "Helps with Internet queries by searching the internet.".to_string(),
            skill_id: "internet_search".to_string(),
            skill_name: "Search internet".to_string(),
            skill_description: "Helps with general queries by searching the internet."
                .to_string(),
            tags: vec![
                "internet".to_string(),
                "search".to_string(),
                "general".to_string(),
            ],
            examples: vec![
                "who is PM of India?".to_string(),
                "Latest news on AI".to_string(),
            ],
            streaming: true,
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique, used in logs)
    pub name: String,
    /// Provider implementation to use
    pub engine: String,
    /// Whether the provider is left out of the chain
    pub disabled: bool,
    /// Custom budget in seconds
    pub timeout: Option<f64>,
    /// API key, usually resolved from `api_key_env`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Override of the provider endpoint
    pub base_url: Option<String>,
    /// Result language, for providers that support one
    pub language: Option<String>,
    /// Maximum number of snippets returned
    pub max_results: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            engine: String::new(),
            disabled: false,
            timeout: None,
            api_key: None,
            api_key_env: None,
            base_url: None,
            language: None,
            max_results: 3,
        }
    }
}

impl ProviderConfig {
    /// Config for a provider whose engine matches its name
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            engine: name.clone(),
            name,
            ..Default::default()
        }
    }

    /// Variable the API key is read from: `api_key_env`, else the engine's default
    pub fn key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| default_key_env(&self.engine))
    }

    pub fn credential(&self) -> CredentialState {
        match (self.key_env(), &self.api_key) {
            (_, Some(_)) => CredentialState::Set,
            (Some(_), None) => CredentialState::Missing,
            (None, None) => CredentialState::NotRequired,
        }
    }

    pub fn with_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Whether a provider has the credential it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    NotRequired,
    Missing,
    Set,
}

impl std::fmt::Display for CredentialState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NotRequired => "n/a",
            Self::Missing => "missing",
            Self::Set => "set",
        })
    }
}

/// Environment variable an engine reads its API key from by default
pub fn default_key_env(engine: &str) -> Option<&'static str> {
    match engine {
        "brave" => Some("BRAVE_API_KEY"),
        "tavily" => Some("TAVILY_API_KEY"),
        "serper" => Some("SERPER_API_KEY"),
        _ => None,
    }
}

/// Default chain: free providers first, paid ones last
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::named("duckduckgo"),
        ProviderConfig::named("wikipedia"),
        ProviderConfig::named("brave"),
        ProviderConfig::named("tavily"),
        ProviderConfig::named("serper"),
    ]
}
