use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "BOTKIT_CONFIG";

/// Conventional config location, relative to the bot project directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/config.toml";

/// Default root for bot working folders, relative to the home directory.
pub const DEFAULT_BASE_PATH: &str = "Documents/botkit";

/// Folder roles created when the config does not list any.
pub const DEFAULT_SUBFOLDERS: [&str; 5] = ["input", "output", "temp", "screenshots", "logs"];

const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Settings read from `config/config.toml`. Every key has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bot: BotConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
    pub folders: FoldersConfig,
}

/// `[bot]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: Option<String>,
}

/// `[agent]` section: where the local control plane listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "localhost".to_string(),
            port: 8080,
            timeout_secs: 30,
        }
    }
}

impl AgentConfig {
    /// Per-request timeout, clamped so a bad value can neither disable nor
    /// stretch the bound indefinitely.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS))
    }
}

/// How the file log destination is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    /// `<bot>_<YYYYmmdd_HHMMSS>.log` per run plus an overwritten `<bot>_latest.log`.
    #[default]
    Timestamped,
    /// `<bot>.<date>.log`, rotated daily, keeping `max_files` files.
    Daily,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub file_mode: FileMode,
    pub max_files: usize,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file_enabled: true,
            file_mode: FileMode::Timestamped,
            max_files: 5,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Severity threshold. Unknown names fall back to INFO.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_uppercase().as_str() {
            "OFF" => LevelFilter::OFF,
            "TRACE" => LevelFilter::TRACE,
            "DEBUG" => LevelFilter::DEBUG,
            "INFO" => LevelFilter::INFO,
            "WARN" | "WARNING" => LevelFilter::WARN,
            "ERROR" | "CRITICAL" | "FATAL" => LevelFilter::ERROR,
            _ => LevelFilter::INFO,
        }
    }
}

/// `[folders]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    pub base_path: String,
    #[serde(deserialize_with = "deserialize_names")]
    pub subfolder_names: Vec<String>,
}

impl Default for FoldersConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            subfolder_names: DEFAULT_SUBFOLDERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Accept either a TOML array or a comma-separated string.
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        List(Vec<String>),
        Csv(String),
    }

    let names = match Names::deserialize(deserializer)? {
        Names::List(list) => list,
        Names::Csv(csv) => csv.split(',').map(str::to_string).collect(),
    };
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// Supplied programmatically.
    Provided,
    /// Built-in defaults; `reason` says why no file was used.
    Defaults { reason: String },
}

/// Locates and reads the config file.
pub struct ConfigStore {
    path: Option<PathBuf>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Probe `$BOTKIT_CONFIG`, then `./config/config.toml`, then
    /// `config/config.toml` beside the running executable.
    pub fn new() -> Self {
        Self {
            path: Self::discover(),
        }
    }

    /// Use an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn discover() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(explicit));
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
            .filter(|p| p.is_file())
    }

    /// Load the config, or fall back to defaults. Never fails.
    pub fn load(&self) -> Config {
        self.load_with_source().0
    }

    /// Like [`ConfigStore::load`], also reporting where the values came from.
    pub fn load_with_source(&self) -> (Config, ConfigSource) {
        let Some(path) = self.path.as_ref() else {
            return defaults("Config file not found");
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return defaults(format!("Config file not found: {}", path.display()));
            }
            Err(e) => return defaults(format!("Error loading config {}: {e}", path.display())),
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => (config, ConfigSource::File(path.clone())),
            Err(e) => defaults(format!("Error parsing config {}: {e}", path.display())),
        }
    }
}

fn defaults(reason: impl Into<String>) -> (Config, ConfigSource) {
    (
        Config::default(),
        ConfigSource::Defaults {
            reason: reason.into(),
        },
    )
}

impl Config {
    /// Load from `path`, or from the conventional locations when `None`.
    pub fn load(path: Option<&Path>) -> Config {
        Self::load_with_source(path).0
    }

    pub fn load_with_source(path: Option<&Path>) -> (Config, ConfigSource) {
        match path {
            Some(path) => ConfigStore::at(path).load_with_source(),
            None => ConfigStore::new().load_with_source(),
        }
    }
}
