//! Error types for the botkit-agent crate.

/// Errors raised by direct calls against the bot agent API.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The agent answered 404 for the requested asset.
    #[error("{0}")]
    AssetNotFound(String),

    /// The agent answered 403 for the requested asset.
    #[error("Not authorized to access asset '{0}'")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Connection refused, timeout, DNS failure and other transport errors.
    #[error("Error connecting to bot agent: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// Host/port do not form a usable base URL, or the HTTP client could not be built.
    #[error("Invalid agent address: {0}")]
    InvalidAddress(String),

    /// The agent answered 200 but the body was not what the endpoint promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AgentError {
    /// Whether the error means the agent could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, AgentError::Unreachable(_))
    }
}
