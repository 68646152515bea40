//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::router::FallbackRouter;
use crate::tools::ToolServer;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Fallback router
    pub router: Arc<FallbackRouter>,
    /// JSON-RPC tool handler
    pub tools: ToolServer,
    /// Router metrics
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, router: Arc<FallbackRouter>, metrics: Arc<Metrics>) -> Self {
        let tools = ToolServer::new(router.clone());

        Self {
            settings: Arc::new(settings),
            router,
            tools,
            metrics,
        }
    }

    /// Advertised agent name
    pub fn agent_name(&self) -> &str {
        &self.settings.agent.name
    }
}
