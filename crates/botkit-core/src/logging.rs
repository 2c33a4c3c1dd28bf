//! Per-bot log destinations.
//!
//! [`BotLogger::setup`] builds a dedicated [`Dispatch`] holding one console
//! layer and at most one file layer. Nothing is installed globally: the bot
//! runs its work under the handle's dispatch, so two bots in one process keep
//! separate destinations and a second setup for the same name starts clean.

use crate::config::{Config, FileMode, LoggingConfig};
use crate::folders::FolderManager;
use std::fs::{self, File, OpenOptions};
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Where log lines for a bot end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Standard error.
    Console,
    /// A per-run file, mirrored into an overwritten `latest` file.
    File { path: PathBuf, latest: PathBuf },
    /// A daily rolling file `<prefix>.<date>.log` inside `directory`.
    RollingFile { directory: PathBuf, prefix: String },
}

/// Logging handle owned by a bot.
#[derive(Clone)]
pub struct BotLogger {
    name: String,
    level: LevelFilter,
    dispatch: Dispatch,
    destinations: Vec<LogDestination>,
}

impl std::fmt::Debug for BotLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotLogger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("destinations", &self.destinations)
            .finish()
    }
}

impl BotLogger {
    /// Build the logger for `name`, writing files under the bot's `logs` folder.
    ///
    /// Never fails: if the file destination cannot be opened a warning goes to
    /// the console and logging continues console-only.
    pub fn setup(name: &str, config: &Config) -> Self {
        match FolderManager::new(name, config) {
            Ok(folders) => Self::setup_in(name, &config.logging, &folders.path("logs")),
            Err(e) => {
                let console_only = LoggingConfig {
                    file_enabled: false,
                    ..config.logging.clone()
                };
                let logger = Self::setup_in(name, &console_only, Path::new("."));
                logger.in_scope(|| tracing::warn!("Could not setup file logging: {e}"));
                logger
            }
        }
    }

    /// Same as [`BotLogger::setup`] with an explicit log directory.
    pub fn setup_in(name: &str, logging: &LoggingConfig, logs_dir: &Path) -> Self {
        let level = logging.level_filter();

        let console: BoxedLayer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(logging.ansi)
            .with_target(true)
            .with_filter(level)
            .boxed();
        let mut layers: Vec<BoxedLayer> = vec![console];
        let mut destinations = vec![LogDestination::Console];

        let mut file_error = None;
        if logging.file_enabled {
            match file_layer(name, logging, logs_dir) {
                Ok((layer, destination)) => {
                    layers.push(layer.with_filter(level).boxed());
                    destinations.push(destination);
                }
                Err(e) => file_error = Some(e),
            }
        }

        let dispatch = Dispatch::new(tracing_subscriber::registry().with(layers));
        let logger = Self {
            name: name.to_string(),
            level,
            dispatch,
            destinations,
        };

        logger.in_scope(|| match (&file_error, logger.file_destination()) {
            (Some(e), _) => tracing::warn!("Could not setup file logging: {e}"),
            (None, Some(LogDestination::File { path, .. })) => {
                tracing::info!("Logging to: {}", path.display());
            }
            (None, Some(LogDestination::RollingFile { directory, prefix })) => {
                tracing::info!("Logging to: {}/{prefix}.*.log", directory.display());
            }
            _ => {}
        });

        logger
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn destinations(&self) -> &[LogDestination] {
        &self.destinations
    }

    /// The file destination, if one was attached.
    pub fn file_destination(&self) -> Option<&LogDestination> {
        self.destinations
            .iter()
            .find(|d| !matches!(d, LogDestination::Console))
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the default subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Attach this logger to a future for every poll.
    pub fn scope<F: Future>(&self, future: F) -> WithDispatch<F> {
        future.with_subscriber(self.dispatch.clone())
    }
}

fn file_layer(
    name: &str,
    logging: &LoggingConfig,
    logs_dir: &Path,
) -> io::Result<(BoxedLayer, LogDestination)> {
    fs::create_dir_all(logs_dir)?;

    match logging.file_mode {
        FileMode::Timestamped => {
            let (path, run) = create_run_file(name, logs_dir)?;
            let latest = logs_dir.join(format!("{name}_latest.log"));
            let writer = RunLogFiles {
                run,
                latest: File::create(&latest)?,
            };
            let layer: BoxedLayer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            Ok((layer, LogDestination::File { path, latest }))
        }
        FileMode::Daily => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(name)
                .filename_suffix("log")
                .max_log_files(logging.max_files.max(1))
                .build(logs_dir)
                .map_err(io::Error::other)?;
            let layer: BoxedLayer = tracing_subscriber::fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            Ok((
                layer,
                LogDestination::RollingFile {
                    directory: logs_dir.to_path_buf(),
                    prefix: name.to_string(),
                },
            ))
        }
    }
}

/// Create `<name>_<timestamp>.log`, adding `_<n>` when a setup within the
/// same second already claimed that name.
fn create_run_file(name: &str, logs_dir: &Path) -> io::Result<(PathBuf, File)> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut attempt = 0u32;
    loop {
        let file_name = match attempt {
            0 => format!("{name}_{timestamp}.log"),
            n => format!("{name}_{timestamp}_{n}.log"),
        };
        let path = logs_dir.join(file_name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < 1000 => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// The per-run log file and the `latest` copy, written together.
struct RunLogFiles {
    run: File,
    latest: File,
}

struct RunLogWriter<'a> {
    run: &'a File,
    latest: &'a File,
}

impl<'a> MakeWriter<'a> for RunLogFiles {
    type Writer = RunLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RunLogWriter {
            run: &self.run,
            latest: &self.latest,
        }
    }
}

impl Write for RunLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.run.write_all(buf)?;
        self.latest.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.run.flush()?;
        self.latest.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_config() -> LoggingConfig {
        LoggingConfig {
            ansi: false,
            ..Default::default()
        }
    }

    fn count(logger: &BotLogger) -> (usize, usize) {
        let console = logger
            .destinations()
            .iter()
            .filter(|d| matches!(d, LogDestination::Console))
            .count();
        (console, logger.destinations().len() - console)
    }

    #[test]
    fn test_console_and_file_destinations() {
        let dir = TempDir::new().unwrap();
        let logger = BotLogger::setup_in("LogBot", &quiet_config(), dir.path());
        assert_eq!(count(&logger), (1, 1));

        logger.in_scope(|| tracing::info!("hello from the bot"));

        match logger.file_destination() {
            Some(LogDestination::File { path, latest }) => {
                assert!(path.exists());
                let file_name = path.file_name().unwrap().to_string_lossy();
                assert!(file_name.starts_with("LogBot_"));
                assert!(file_name.ends_with(".log"));
                let content = fs::read_to_string(latest).unwrap();
                assert!(content.contains("hello from the bot"));
                assert!(content.contains("INFO"));
            }
            other => panic!("expected file destination, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_setup_does_not_duplicate() {
        let dir = TempDir::new().unwrap();
        let first = BotLogger::setup_in("LogBot", &quiet_config(), dir.path());
        let second = BotLogger::setup_in("LogBot", &quiet_config(), dir.path());
        assert_eq!(count(&first), (1, 1));
        assert_eq!(count(&second), (1, 1));

        second.in_scope(|| tracing::info!("only once"));
        let Some(LogDestination::File { latest, .. }) = second.file_destination() else {
            panic!("expected file destination");
        };
        let content = fs::read_to_string(latest).unwrap();
        assert_eq!(content.matches("only once").count(), 1);
    }

    #[test]
    fn test_back_to_back_setups_get_separate_run_files() {
        let dir = TempDir::new().unwrap();
        let first = BotLogger::setup_in("LogBot", &quiet_config(), dir.path());
        let second = BotLogger::setup_in("LogBot", &quiet_config(), dir.path());

        let Some(LogDestination::File { path: first_path, .. }) = first.file_destination() else {
            panic!("expected file destination");
        };
        let Some(LogDestination::File { path: second_path, .. }) = second.file_destination() else {
            panic!("expected file destination");
        };
        assert_ne!(first_path, second_path);

        first.in_scope(|| tracing::info!("first run line"));
        second.in_scope(|| tracing::info!("second run line"));
        let first_content = fs::read_to_string(first_path).unwrap();
        let second_content = fs::read_to_string(second_path).unwrap();
        assert!(first_content.contains("first run line"));
        assert!(!first_content.contains("second run line"));
        assert!(second_content.contains("second run line"));
        assert!(!second_content.contains("first run line"));
    }

    #[test]
    fn test_invalid_bot_name_logs_to_console_only() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.folders.base_path = dir.path().to_string_lossy().to_string();
        config.logging.ansi = false;

        let logger = BotLogger::setup("../escaped", &config);
        assert_eq!(logger.destinations(), &[LogDestination::Console]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_disabled_is_console_only() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            file_enabled: false,
            ..quiet_config()
        };
        let logger = BotLogger::setup_in("LogBot", &config, dir.path());
        assert_eq!(logger.destinations(), &[LogDestination::Console]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_log_dir_falls_back_to_console() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let logger = BotLogger::setup_in("LogBot", &quiet_config(), &blocker.join("logs"));
        assert_eq!(logger.destinations(), &[LogDestination::Console]);
    }

    #[test]
    fn test_level_threshold_applies_to_file() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            level: "WARNING".to_string(),
            ..quiet_config()
        };
        let logger = BotLogger::setup_in("LogBot", &config, dir.path());
        assert_eq!(logger.level(), LevelFilter::WARN);

        logger.in_scope(|| {
            tracing::info!("suppressed line");
            tracing::warn!("kept line");
        });

        let Some(LogDestination::File { latest, .. }) = logger.file_destination() else {
            panic!("expected file destination");
        };
        let content = fs::read_to_string(latest).unwrap();
        assert!(!content.contains("suppressed line"));
        assert!(content.contains("kept line"));
    }

    #[test]
    fn test_daily_mode_uses_rolling_file() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            file_mode: FileMode::Daily,
            ..quiet_config()
        };
        let logger = BotLogger::setup_in("LogBot", &config, dir.path());
        assert_eq!(
            logger.file_destination(),
            Some(&LogDestination::RollingFile {
                directory: dir.path().to_path_buf(),
                prefix: "LogBot".to_string(),
            })
        );

        logger.in_scope(|| tracing::info!("rolled"));
        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert!(files.iter().any(|f| f.starts_with("LogBot.") && f.ends_with(".log")));
    }
}
