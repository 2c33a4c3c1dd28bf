//! Control plane trait definition.

use crate::error::AgentError;
use crate::types::LogLevel;
use async_trait::async_trait;

/// The remote capabilities a bot can use while it runs.
///
/// Implementations are strict: every failure surfaces as an [`AgentError`].
/// Degrading around an absent or failing control plane is the caller's job.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Human-readable endpoint, used in log lines.
    fn endpoint(&self) -> &str;

    /// Fetch an asset value by key.
    async fn get_asset(&self, key: &str) -> Result<String, AgentError>;

    /// List every asset key visible to this bot.
    async fn list_asset_keys(&self) -> Result<Vec<String>, AgentError>;

    /// Push a status string, optionally scoped to one execution.
    ///
    /// `Ok(false)` means the agent answered but did not acknowledge.
    async fn update_status(
        &self,
        status: &str,
        execution_id: Option<&str>,
    ) -> Result<bool, AgentError>;

    /// Forward a log line. Never fails; returns whether the agent accepted it.
    async fn log(&self, message: &str, level: LogLevel) -> bool;
}

// Compile-time check: ControlPlane must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn ControlPlane) {}
};
