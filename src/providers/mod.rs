//! Search provider module
//!
//! Defines the provider traits, the ordered chain, and the concrete
//! providers behind it.

mod blocking;
mod chain;
mod http;
mod loader;
mod text;
mod traits;

// Provider implementations
pub mod brave;
pub mod duckduckgo;
pub mod serper;
pub mod tavily;
pub mod wikipedia;

pub use blocking::BlockingProvider;
pub use chain::{ProviderChain, ProviderDescriptor};
pub use http::HttpProvider;
pub use loader::ProviderLoader;
pub use traits::*;
