// src/errors.rs

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure reported by a [`CommandExecutor`](crate::utils::command::CommandExecutor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Failed to launch command '{command}': {message}")]
    Launch { command: String, message: String },

    /// The command ran but exited unsuccessfully.
    #[error("{message}")]
    Failed {
        command: String,
        message: String,
        output: Option<String>,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to serialize backup data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum TweakError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("No backup found and no default value defined for '{0}'")]
    NothingToRevert(String),

    #[error("Tweak was applied but its backup could not be saved: {0}")]
    Persist(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup '{0}' not found")]
    NotFound(String),

    #[error("Backup '{0}' cannot be restored (no previous value)")]
    CannotRestore(String),

    #[error("Backup '{0}' has already been restored")]
    AlreadyRestored(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Persist(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to configure service '{name}': {source}")]
    Configure { name: String, source: CommandError },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to remove app '{name}': {source}")]
    Remove { name: String, source: CommandError },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid registry path: '{0}'. Expected format 'HIVE\\Subkey\\...'")]
    InvalidPath(String),

    #[error("Unsupported registry hive: '{0}'")]
    UnsupportedHive(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
