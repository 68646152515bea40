//! Providers backed by plain synchronous functions

use super::traits::SearchProvider;
use crate::results::{ProviderError, SearchOutput};
use async_trait::async_trait;
use std::sync::Arc;

type SearchFn = dyn Fn(&str) -> Result<SearchOutput, ProviderError> + Send + Sync;

/// Wraps a blocking `query -> result` function.
///
/// Calls run on tokio's blocking pool. A blocking call cannot be interrupted:
/// when the router gives up on it, the thread keeps running until the
/// function returns and its result is dropped.
pub struct BlockingProvider {
    name: String,
    func: Arc<SearchFn>,
}

impl BlockingProvider {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<SearchOutput, ProviderError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl SearchProvider for BlockingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<SearchOutput, ProviderError> {
        let func = Arc::clone(&self.func);
        let query = query.to_string();

        tokio::task::spawn_blocking(move || func(&query))
            .await
            .map_err(|_| ProviderError::Panicked)?
    }
}
