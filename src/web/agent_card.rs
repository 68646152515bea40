//! A2A agent card advertised at `/.well-known/agent.json`

use crate::config::Settings;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

/// Content types the agent accepts and produces
const SUPPORTED_CONTENT_TYPES: &[&str] = &["text"];

impl AgentCard {
    pub fn from_settings(settings: &Settings) -> Self {
        let agent = &settings.agent;
        let modes: Vec<String> = SUPPORTED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect();

        Self {
            name: agent.name.clone(),
            description: agent.description.clone(),
            url: settings.server.advertised_url(),
            version: crate::VERSION.to_string(),
            default_input_modes: modes.clone(),
            default_output_modes: modes,
            capabilities: AgentCapabilities {
                streaming: agent.streaming,
            },
            skills: vec![AgentSkill {
                id: agent.skill_id.clone(),
                name: agent.skill_name.clone(),
                description: agent.skill_description.clone(),
                tags: agent.tags.clone(),
                examples: agent.examples.clone(),
            }],
        }
    }
}
