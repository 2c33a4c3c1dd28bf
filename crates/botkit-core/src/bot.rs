//! Bot lifecycle.
//!
//! Construction loads config, sets up logging, tries to attach the agent and
//! prepares working folders. Only the folder step can fail: a bot without its
//! working directories cannot do anything useful. A missing agent leaves the
//! bot degraded but ready, and every agent-backed capability then falls back
//! to an empty answer instead of an error.

use crate::automation::Automation;
use crate::config::{AgentConfig, Config, ConfigSource};
use crate::error::BotError;
use crate::folders::FolderManager;
use crate::logging::BotLogger;
use crate::outcome::{ExecutionResult, DEFAULT_SUCCESS_MESSAGE};
use botkit_agent::{AgentClient, ControlPlane, LogLevel};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where a bot is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// Constructed, waiting for `run`.
    Ready,
    /// Inside `run`.
    Running,
    /// `run` has returned; the bot will not execute again.
    Completed,
}

/// Construction options for [`Bot`].
#[derive(Default)]
pub struct BotOptions {
    config_path: Option<PathBuf>,
    config: Option<(Config, ConfigSource)>,
    control_plane: Option<Arc<dyn ControlPlane>>,
}

impl BotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read config from this file instead of the conventional locations.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use this config as-is; no file is read.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some((config, ConfigSource::Provided));
        self
    }

    /// Use a config the caller already loaded, keeping its source for the
    /// startup log.
    pub fn loaded_config(mut self, config: Config, source: ConfigSource) -> Self {
        self.config = Some((config, source));
        self
    }

    /// Use this control plane instead of building an [`AgentClient`] from config.
    pub fn control_plane(mut self, control_plane: Arc<dyn ControlPlane>) -> Self {
        self.control_plane = Some(control_plane);
        self
    }
}

/// A named bot: config, logging, working folders and an optional agent.
pub struct Bot {
    name: String,
    config: Config,
    logger: BotLogger,
    agent: Option<Arc<dyn ControlPlane>>,
    folders: FolderManager,
    state: BotState,
    started: Instant,
}

impl Bot {
    /// Construct with config from the conventional locations.
    pub fn new(name: impl Into<String>) -> Result<Self, BotError> {
        Self::with_options(name, BotOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: BotOptions) -> Result<Self, BotError> {
        let name = name.into();
        let BotOptions {
            config_path,
            config,
            control_plane,
        } = options;

        let (mut config, source) = match config {
            Some(loaded) => loaded,
            None => Config::load_with_source(config_path.as_deref()),
        };
        config.bot.name.get_or_insert_with(|| name.clone());

        let logger = BotLogger::setup(&name, &config);

        let (agent, folders) = logger.in_scope(|| {
            match &source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loaded configuration from {}", path.display());
                }
                ConfigSource::Defaults { reason } => tracing::info!("{reason}, using defaults"),
                ConfigSource::Provided => {}
            }

            let agent = connect_agent(&config.agent, control_plane);

            let folders = FolderManager::new(&name, &config)
                .and_then(|folders| folders.create_all().map(|_| folders));
            match folders {
                Ok(folders) => Ok((agent, folders)),
                Err(e) => {
                    tracing::error!("Error creating folders: {e}");
                    Err(BotError::from(e))
                }
            }
        })?;

        let bot = Self {
            name,
            config,
            logger,
            agent,
            folders,
            state: BotState::Ready,
            started: Instant::now(),
        };
        bot.logger
            .in_scope(|| tracing::info!("Bot '{}' initialized", bot.name));
        Ok(bot)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn folders(&self) -> &FolderManager {
        &self.folders
    }

    pub fn logger(&self) -> &BotLogger {
        &self.logger
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    /// True when running without a control plane.
    pub fn is_degraded(&self) -> bool {
        self.agent.is_none()
    }

    pub fn agent_endpoint(&self) -> Option<&str> {
        self.agent.as_deref().map(|agent| agent.endpoint())
    }

    /// Time since construction.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fetch an asset, or `None` when there is no agent or the call fails.
    pub async fn get_asset(&self, key: &str) -> Option<String> {
        let agent = self.agent.as_ref()?;
        self.logger
            .scope(async {
                match agent.get_asset(key).await {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::debug!("Could not get asset '{key}': {e}");
                        None
                    }
                }
            })
            .await
    }

    /// Every asset key, or an empty list when there is no agent or the call fails.
    pub async fn get_all_asset_keys(&self) -> Vec<String> {
        let Some(agent) = self.agent.as_ref() else {
            return Vec::new();
        };
        self.logger
            .scope(async {
                agent.list_asset_keys().await.unwrap_or_else(|e| {
                    tracing::debug!("Could not get asset keys: {e}");
                    Vec::new()
                })
            })
            .await
    }

    /// Report progress. Returns whether the agent acknowledged it.
    pub async fn update_status(&self, status: &str) -> bool {
        self.update_status_for(status, None).await
    }

    /// Report progress for one execution. Returns whether the agent acknowledged it.
    pub async fn update_status_for(&self, status: &str, execution_id: Option<&str>) -> bool {
        self.logger
            .scope(async {
                let Some(agent) = self.agent.as_ref() else {
                    tracing::info!("Status: {status}");
                    return false;
                };
                agent
                    .update_status(status, execution_id)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::debug!("Could not update status: {e}");
                        false
                    })
            })
            .await
    }

    /// Forward a log line to the agent. `false` when there is no agent.
    pub async fn log_remote(&self, message: &str, level: LogLevel) -> bool {
        match self.agent.as_ref() {
            Some(agent) => self.logger.scope(agent.log(message, level)).await,
            None => false,
        }
    }

    /// Execute `automation` once and report the outcome.
    ///
    /// Never fails: errors and panics from the automation end up in the
    /// returned record with `success = false`.
    pub async fn run<A>(&mut self, automation: &mut A) -> ExecutionResult
    where
        A: Automation + ?Sized,
    {
        let logger = self.logger.clone();
        logger.scope(self.run_inner(automation)).await
    }

    async fn run_inner<A>(&mut self, automation: &mut A) -> ExecutionResult
    where
        A: Automation + ?Sized,
    {
        let mut result = ExecutionResult::pending();

        if self.state == BotState::Completed {
            result.message = format!("Bot '{}' has already completed its run", self.name);
            result.execution_time = self.elapsed().as_secs_f64();
            tracing::warn!("{}", result.message);
            return result;
        }

        self.state = BotState::Running;
        self.log_start();

        let outcome = AssertUnwindSafe(automation.execute(&*self))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(outcome)) => {
                result.merge(outcome);
                result.success = true;
                if result.message.is_empty() {
                    result.message = DEFAULT_SUCCESS_MESSAGE.to_string();
                }
                tracing::info!("Automation completed successfully");
            }
            Ok(Err(err)) => record_failure(&mut result, format!("{err:#}")),
            Err(panic) => record_failure(&mut result, panic_message(&*panic)),
        }

        result.execution_time = self.elapsed().as_secs_f64();
        self.state = BotState::Completed;
        self.log_end(&result);
        result
    }

    fn log_start(&self) {
        tracing::info!("=== Bot Execution Started ===");
        tracing::info!("Bot Name: {}", self.name);
        tracing::info!(
            "Start Time: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        tracing::info!("Agent: {}", self.agent_endpoint().unwrap_or("standalone"));
    }

    fn log_end(&self, result: &ExecutionResult) {
        tracing::info!("=== Bot Execution Completed ===");
        tracing::info!("Success: {}", result.success);
        tracing::info!(
            "End Time: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        tracing::info!("Execution completed in {:.2} seconds", result.execution_time);
    }
}

fn connect_agent(
    config: &AgentConfig,
    injected: Option<Arc<dyn ControlPlane>>,
) -> Option<Arc<dyn ControlPlane>> {
    if let Some(agent) = injected {
        tracing::info!("Using bot agent at {}", agent.endpoint());
        return Some(agent);
    }

    if !config.enabled {
        tracing::info!("Agent not available: disabled by configuration");
        return None;
    }

    match AgentClient::new(&config.host, config.port, config.timeout()) {
        Ok(client) => {
            tracing::info!("Connected to bot agent at {}:{}", config.host, config.port);
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::info!("Agent not available: {e}");
            None
        }
    }
}

fn record_failure(result: &mut ExecutionResult, cause: String) {
    let message = format!("Error during automation: {cause}");
    tracing::error!("{message}");
    result.success = false;
    result.message = message;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
