//! Command implementations.

pub mod agent;
pub mod folders;
pub mod run;

use botkit_core::Config;

/// Typed error used to propagate a process exit code after output was printed.
#[derive(Debug, thiserror::Error)]
#[error("exit code {code}")]
pub struct ExitError {
    pub code: i32,
}

/// `--name`, else `[bot] name` from the config.
pub fn bot_name(flag: Option<&str>, config: &Config) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| config.bot.name.clone())
        .filter(|n| !n.trim().is_empty())
}

pub fn require_bot_name(flag: Option<&str>, config: &Config) -> anyhow::Result<String> {
    bot_name(flag, config).ok_or_else(|| {
        anyhow::anyhow!("No bot name. Pass --name or set it in the config:\n  [bot]\n  name = \"MyBot\"")
    })
}
