//! Error types for compose-helper

use std::path::PathBuf;
use thiserror::Error;

/// Result type for compose-helper operations
pub type Result<T> = std::result::Result<T, HelperError>;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("Config file {} not found. Register the app with compose-register first.", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Application '{app}' is not registered in {}", .path.display())]
    AppNotRegistered { app: String, path: PathBuf },

    #[error("Config parse error at line {line}: {message}")]
    ConfigParse { line: usize, message: String },

    #[error("'{field}' not defined for '{app}' in the config file")]
    MissingField { app: String, field: &'static str },

    #[error("Application '{app}' could not be found at {}", .path.display())]
    AppDirNotFound { app: String, path: PathBuf },

    #[error("No service to ssh into. Pass -s/--service or set default_service.")]
    NoServiceSelected,

    #[error("Command {0} is not supported.")]
    UnrecognizedCommand(String),

    #[error("Failed to start {program}: {source}")]
    SpawnFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid application name: {0}")]
    InvalidAppName(String),

    #[error("Permission denied: can't write to {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Cannot determine application from invocation: {0}")]
    InvalidInvocation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
