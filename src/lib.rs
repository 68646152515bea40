//! internet-search: a fallback web search agent
//!
//! Resolves a free-text query by trying a fixed, ordered chain of search
//! providers one at a time, each inside its own time budget, and returns the
//! first answer. When every provider fails the caller gets a fixed
//! apology string instead of an error.

pub mod config;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod router;
pub mod tools;
pub mod web;

pub use config::Settings;
pub use providers::{ProviderChain, SearchProvider};
pub use results::{ProviderError, SearchOutput};
pub use router::{FallbackRouter, SearchReport};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-provider budget in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum budget that can be set
pub const MAX_TIMEOUT: u64 = 30;

/// Returned in place of a result when every provider failed
pub const FAILURE_SENTINEL: &str =
    "All search tools failed to return a result. Please try again later.";
