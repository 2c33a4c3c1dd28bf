//! Per-bot working folders.
//!
//! Layout: `<root>/<bot name>/<role>`, where `<root>` comes from
//! `folders.base_path`. Roles listed in `folders.subfolder_names` are created
//! at startup; `output` and `temp` are emptied by [`FolderManager::clean`].

use crate::config::Config;
use crate::error::FolderError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Roles whose contents [`FolderManager::clean`] removes.
pub const TRANSIENT_ROLES: [&str; 2] = ["output", "temp"];

/// Resolves and prepares the working folders of one bot.
#[derive(Debug, Clone)]
pub struct FolderManager {
    base: PathBuf,
    roles: Vec<String>,
}

impl FolderManager {
    /// Fails when `bot_name` is not a single plain path component.
    pub fn new(bot_name: &str, config: &Config) -> Result<Self, FolderError> {
        Ok(Self {
            base: Self::base_path(bot_name, config)?,
            roles: config.folders.subfolder_names.clone(),
        })
    }

    /// `<root>/<bot_name>`. Absolute roots are used as-is, `~` expands to the
    /// home directory and any other relative root is taken under home.
    pub fn base_path(bot_name: &str, config: &Config) -> Result<PathBuf, FolderError> {
        if !is_single_component(bot_name) {
            return Err(FolderError::InvalidBotName(bot_name.to_string()));
        }
        Ok(resolve_root(&config.folders.base_path).join(bot_name))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Roles created by [`FolderManager::create_all`].
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Path of `role`, without touching the filesystem.
    pub fn path(&self, role: &str) -> PathBuf {
        self.base.join(role)
    }

    /// Path of `role` after checking it stays inside the bot folder.
    pub fn resolve(&self, role: &str) -> Result<PathBuf, FolderError> {
        if !is_single_component(role) {
            return Err(FolderError::InvalidRole(role.to_string()));
        }
        Ok(self.path(role))
    }

    /// Path of `role`, created (with parents) if missing.
    pub fn ensure(&self, role: &str) -> Result<PathBuf, FolderError> {
        let path = self.resolve(role)?;
        fs::create_dir_all(&path).map_err(|source| FolderError::Creation {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Create every configured role.
    pub fn create_all(&self) -> Result<Vec<PathBuf>, FolderError> {
        let mut created = Vec::with_capacity(self.roles.len());
        for role in &self.roles {
            let path = self.ensure(role)?;
            tracing::debug!("Created folder: {}", path.display());
            created.push(path);
        }
        Ok(created)
    }

    /// Empty the transient roles, keeping the role directories themselves.
    ///
    /// Best-effort: failures are logged and skipped. Returns how many entries
    /// were removed.
    pub fn clean(&self) -> usize {
        let mut removed = 0;
        for role in TRANSIENT_ROLES {
            let dir = self.path(role);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("Error cleaning folder {}: {e}", dir.display());
                    continue;
                }
            };

            for entry in entries {
                let result = entry.and_then(|entry| {
                    let path = entry.path();
                    if entry.file_type()?.is_dir() {
                        fs::remove_dir_all(&path)
                    } else {
                        fs::remove_file(&path)
                    }
                });
                match result {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("Error cleaning folder {}: {e}", dir.display()),
                }
            }
            tracing::info!("Cleaned folder: {}", dir.display());
        }
        removed
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn resolve_root(configured: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let trimmed = configured.trim();

    if trimmed == "~" {
        return home();
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return home().join(rest);
    }

    let path = PathBuf::from(trimmed);
    if path.is_absolute() {
        path
    } else {
        home().join(path)
    }
}
