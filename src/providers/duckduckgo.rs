//! DuckDuckGo provider (HTML endpoint, no key)

use super::text::clean_snippet;
use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{ProviderError, SearchOutput};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;

static RESULT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.result").expect("selector"));
static SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__snippet").expect("selector"));

/// DuckDuckGo web search, answering with the text of the top snippets
pub struct DuckDuckGo {
    html_url: String,
    region: String,
    max_results: usize,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            html_url: "https://html.duckduckgo.com/html/".to_string(),
            region: "wt-wt".to_string(),
            max_results: 3,
        }
    }

    fn parse_snippets(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&RESULT)
            // sponsored entries
            .filter(|el| !el.value().classes().any(|c| c == "result--ad"))
            .filter_map(|el| el.select(&SNIPPET).next())
            .map(|snippet| clean_snippet(&snippet.inner_html()))
            .filter(|body| !body.is_empty())
            .take(self.max_results)
            .collect()
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn about(&self) -> EngineAbout {
        EngineAbout::new()
            .website("https://duckduckgo.com")
            .official_api(false)
            .results_format("HTML")
    }

    fn init(&mut self, config: &ProviderConfig) -> Result<(), ProviderError> {
        if let Some(ref url) = config.base_url {
            self.html_url = url.clone();
        }
        self.max_results = config.max_results.max(1);
        Ok(())
    }

    fn request(&self, query: &str) -> Result<EngineRequest, ProviderError> {
        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), query.to_string());
        form_data.insert("b".to_string(), String::new());
        form_data.insert("kl".to_string(), self.region.clone());

        Ok(EngineRequest::post(&self.html_url)
            .header("Referer", "https://html.duckduckgo.com/")
            .form(form_data))
    }

    fn response(&self, response: EngineResponse) -> Result<SearchOutput, ProviderError> {
        response.error_for_status()?;

        let snippets = self.parse_snippets(&response.text);
        if snippets.is_empty() {
            // Bot detection answers 202 with an anomaly page instead of results
            if response.status == 202 || response.text.contains("anomaly") || response.is_captcha() {
                return Err(ProviderError::Captcha);
            }
            return Err(ProviderError::EmptyResults);
        }

        Ok(SearchOutput::List(snippets))
    }
}
