//! Builds the provider chain from configuration

use super::chain::ProviderChain;
use super::http::HttpProvider;
use super::traits::{Engine, SearchProvider};
use super::{brave, duckduckgo, serper, tavily, wikipedia};
use crate::config::{CredentialState, ProviderConfig, Settings};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Build the chain in configured order, skipping disabled and unknown
    /// providers. A missing credential does not stop a provider from being
    /// loaded; it fails fast when called.
    pub fn load(settings: &Settings, client: &HttpClient) -> Result<ProviderChain> {
        let mut chain = ProviderChain::new();

        for config in &settings.providers {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.name);
                continue;
            }

            match Self::create_provider(config, client) {
                Ok(provider) => {
                    let budget = settings.budget_for(config);
                    if config.credential() == CredentialState::Missing {
                        warn!(
                            "Provider {} has no credential, its searches will fail until one is set",
                            config.name
                        );
                    }
                    info!(
                        "Loaded provider: {} ({}) with budget {:?}",
                        config.name, config.engine, budget
                    );
                    chain.register(provider, budget);
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!(
            "Provider chain: [{}], worst case {:?}",
            chain.names().join(" -> "),
            chain.total_budget()
        );
        Ok(chain)
    }

    /// Create a provider instance from its config
    fn create_provider(
        config: &ProviderConfig,
        client: &HttpClient,
    ) -> Result<Arc<dyn SearchProvider>> {
        let mut engine: Box<dyn Engine> = match config.engine.as_str() {
            "duckduckgo" => Box::new(duckduckgo::DuckDuckGo::new()),
            "wikipedia" => Box::new(wikipedia::Wikipedia::new()),
            "brave" => Box::new(brave::Brave::new()),
            "tavily" => Box::new(tavily::Tavily::new()),
            "serper" => Box::new(serper::Serper::new()),
            other => {
                return Err(anyhow::anyhow!(
                    "Unknown provider engine: {} (available: {})",
                    other,
                    Self::available_engines().join(", ")
                ));
            }
        };

        engine.init(config)?;

        let provider = HttpProvider::new(Arc::from(engine), client.clone()).named(&config.name);
        Ok(Arc::new(provider))
    }

    /// Get list of available provider engines
    pub fn available_engines() -> Vec<&'static str> {
        vec!["duckduckgo", "wikipedia", "brave", "tavily", "serper"]
    }
}
