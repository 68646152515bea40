//! Router outcome types

use crate::results::{ProviderError, SearchOutput};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Why a single attempt did not produce an answer
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// How one attempt ended
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failed { kind: String, error: String },
    TimedOut { budget_ms: u64 },
}

impl From<&AttemptError> for AttemptOutcome {
    fn from(err: &AttemptError) -> Self {
        match err {
            AttemptError::Provider(e) => Self::Failed {
                kind: e.kind().to_string(),
                error: e.to_string(),
            },
            AttemptError::Timeout(budget) => Self::TimedOut {
                budget_ms: budget.as_millis() as u64,
            },
        }
    }
}

/// Record of one provider attempt
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub provider: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

/// Full account of one router call
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// Provider that answered, `None` when every provider failed
    pub provider: Option<String>,
    /// The answer, or the failure sentinel
    pub result: SearchOutput,
    pub attempts: Vec<AttemptRecord>,
}

impl SearchReport {
    /// True when no provider answered
    pub fn is_exhausted(&self) -> bool {
        self.provider.is_none()
    }
}
