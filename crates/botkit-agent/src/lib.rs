//! botkit-agent: client for the local bot agent control plane.

mod client;
mod error;
pub mod traits;
pub mod types;

pub use client::{AgentClient, DEFAULT_TIMEOUT};
pub use error::AgentError;
pub use traits::ControlPlane;
pub use types::{ErrorBody, LogEntry, LogLevel, StatusUpdate};
