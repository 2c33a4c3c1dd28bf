//! Error types for the botkit-core crate.

use std::path::PathBuf;

/// Errors from the folder manager.
#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    /// A working directory could not be created.
    #[error("Failed to create folder {}: {source}", path.display())]
    Creation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bot names must be a single plain path component.
    #[error("Invalid bot name: {0:?}")]
    InvalidBotName(String),

    /// Role names must be a single plain path component.
    #[error("Invalid folder role: {0:?}")]
    InvalidRole(String),
}

/// Errors that abort bot construction.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Working folders could not be prepared.
    #[error(transparent)]
    Folder(#[from] FolderError),
}
