//! Search routing module
//!
//! Resolves a query against the provider chain, one provider at a time,
//! each inside its own time budget.

mod fallback;
mod models;

pub use fallback::FallbackRouter;
pub use models::*;
