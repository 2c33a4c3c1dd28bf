//! botkit-core: bot lifecycle, configuration, logging and working folders.

pub mod automation;
pub mod bot;
pub mod config;
mod error;
pub mod folders;
pub mod logging;
pub mod outcome;

pub use automation::Automation;
pub use bot::{Bot, BotOptions, BotState};
pub use config::{
    AgentConfig, BotConfig, Config, ConfigSource, ConfigStore, FileMode, FoldersConfig,
    LoggingConfig,
};
pub use error::{BotError, FolderError};
pub use folders::FolderManager;
pub use logging::{BotLogger, LogDestination};
pub use outcome::{ExecutionResult, Outcome, DEFAULT_SUCCESS_MESSAGE};

pub use botkit_agent::{AgentClient, AgentError, ControlPlane, LogLevel};
