//! Web server module
//!
//! Serves the agent card, the JSON search API and the tool server over HTTP.

mod agent_card;
mod handlers;
mod routes;
mod state;

pub use agent_card::{AgentCapabilities, AgentCard, AgentSkill};
pub use routes::create_router;
pub use state::AppState;
