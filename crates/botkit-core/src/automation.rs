//! Automation trait definition.

use crate::bot::Bot;
use crate::outcome::Outcome;
use async_trait::async_trait;

/// The unit of work a bot runs.
///
/// Implementations get the running [`Bot`] for assets, status updates and
/// working folders. Returning an error (or panicking) marks the run as failed;
/// it never escapes [`Bot::run`].
#[async_trait]
pub trait Automation: Send {
    async fn execute(&mut self, bot: &Bot) -> anyhow::Result<Outcome>;
}

// Compile-time check: Automation must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn Automation) {}
};
