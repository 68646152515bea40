//! Result and error type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What a provider hands back, in the provider's own shape.
///
/// The router never converts between variants: a provider that answers with
/// a single string yields `Text`, one that answers with snippets yields `List`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutput {
    Text(String),
    List(Vec<String>),
}

impl SearchOutput {
    /// True when there is nothing worth returning to the agent
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    /// Flatten into text items, one per list element
    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::List(items) => items,
        }
    }
}

impl fmt::Display for SearchOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => f.write_str(&items.join("\n\n")),
        }
    }
}

impl From<String> for SearchOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for SearchOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for SearchOutput {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Errors a single provider call can fail with
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing credential, set {0}")]
    MissingCredential(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("access denied (HTTP {0})")]
    Unauthorized(u16),
    #[error("too many requests")]
    RateLimited,
    #[error("CAPTCHA required")]
    Captcha,
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("no results")]
    EmptyResults,
    #[error("provider worker panicked")]
    Panicked,
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Short stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "missing_credential",
            Self::Network(_) => "network",
            Self::Http(_) => "http",
            Self::Unauthorized(_) => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::Captcha => "captcha",
            Self::Parse(_) => "parse",
            Self::EmptyResults => "empty",
            Self::Panicked => "panicked",
            Self::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape_is_preserved_in_json() {
        let text = SearchOutput::from("an answer");
        assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!("an answer"));

        let list = SearchOutput::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_value(&list).unwrap(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_is_empty() {
        assert!(SearchOutput::from("  ").is_empty());
        assert!(SearchOutput::List(vec![]).is_empty());
        assert!(SearchOutput::List(vec![String::new()]).is_empty());
        assert!(!SearchOutput::List(vec!["x".to_string()]).is_empty());
    }

    #[test]
    fn test_display_joins_items() {
        let list = SearchOutput::from(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(list.to_string(), "first\n\nsecond");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(ProviderError::RateLimited.kind(), "rate_limited");
        assert_eq!(
            ProviderError::MissingCredential("BRAVE_API_KEY".into()).to_string(),
            "missing credential, set BRAVE_API_KEY"
        );
    }
}
