//! What an automation returns and what a run reports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message used when a successful automation does not supply one.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Automation completed successfully";

/// Fields an automation hands back to the bot. Both are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outcome {
    pub message: Option<String>,
    pub data: Map<String, Value>,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Record returned by every [`crate::Bot::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    pub data: Map<String, Value>,
    /// Seconds since the bot was constructed.
    pub execution_time: f64,
}

impl ExecutionResult {
    /// The record before anything has run.
    pub fn pending() -> Self {
        Self {
            success: false,
            message: String::new(),
            data: Map::new(),
            execution_time: 0.0,
        }
    }

    /// Overlay the fields an automation supplied.
    pub fn merge(&mut self, outcome: Outcome) {
        if let Some(message) = outcome.message {
            self.message = message;
        }
        self.data.extend(outcome.data);
    }
}
