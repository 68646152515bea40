//! The ordered provider chain the router walks

use super::traits::SearchProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// A provider together with the time it is allowed per attempt
#[derive(Clone)]
pub struct ProviderDescriptor {
    pub provider: Arc<dyn SearchProvider>,
    pub budget: Duration,
}

impl ProviderDescriptor {
    pub fn name(&self) -> &str {
        self.provider.name()
    }
}

/// Fixed, ordered list of providers.
///
/// Built once at startup and never mutated afterwards; order of registration
/// is the order of attempts.
#[derive(Clone, Default)]
pub struct ProviderChain {
    entries: Vec<ProviderDescriptor>,
}

impl ProviderChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. A second provider with an already registered name
    /// is ignored.
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>, budget: Duration) {
        if self.contains(provider.name()) {
            warn!("Provider {} already registered, ignoring duplicate", provider.name());
            return;
        }
        self.entries.push(ProviderDescriptor { provider, budget });
    }

    /// Builder form of [`ProviderChain::register`]
    pub fn with(mut self, provider: Arc<dyn SearchProvider>, budget: Duration) -> Self {
        self.register(provider, budget);
        self
    }

    /// Descriptors in attempt order
    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.entries.iter()
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.entries.iter().find(|d| d.name() == name)
    }

    /// Provider names in attempt order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Worst-case latency of one router call
    pub fn total_budget(&self) -> Duration {
        self.entries.iter().map(|d| d.budget).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::BlockingProvider;
    use crate::results::SearchOutput;

    fn stub(name: &str) -> Arc<dyn SearchProvider> {
        Arc::new(BlockingProvider::new(name, |_| Ok(SearchOutput::from("ok"))))
    }

    #[test]
    fn test_chain_keeps_registration_order() {
        let chain = ProviderChain::new()
            .with(stub("zeta"), Duration::from_secs(1))
            .with(stub("alpha"), Duration::from_secs(2))
            .with(stub("mid"), Duration::from_secs(3));

        assert_eq!(chain.names(), ["zeta", "alpha", "mid"]);
        assert_eq!(chain.total_budget(), Duration::from_secs(6));
        assert_eq!(chain.get("alpha").unwrap().budget, Duration::from_secs(2));
    }

    #[test]
    fn test_duplicate_names_are_ignored() {
        let chain = ProviderChain::new()
            .with(stub("ddg"), Duration::from_secs(1))
            .with(stub("ddg"), Duration::from_secs(9));

        assert_eq!(chain.len(), 1);
        assert_eq!(chain.get("ddg").unwrap().budget, Duration::from_secs(1));
    }
}
