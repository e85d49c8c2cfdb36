//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Errors raised while loading a single extension
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Extension directory {0} does not exist")]
    DirectoryMissing(String),

    #[error("Failed to read extension directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid manifest for '{name}': {reason}")]
    Manifest { name: String, reason: String },

    #[error("No extension named '{0}' is compiled in")]
    NotFound(String),

    #[error("Extension '{0}' already loaded")]
    AlreadyLoaded(String),

    #[error("Setup of '{name}' failed: {reason}")]
    Setup { name: String, reason: String },

    #[error("Command '{command}' from '{extension}' is already attached by '{owner}'")]
    CommandConflict {
        command: String,
        extension: String,
        owner: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Render an error with its full `source()` chain, one cause per line.
///
/// Causes whose text the parent message already ends with are not repeated.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut parent = out.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parent.ends_with(&text) {
            out.push_str("\n  caused by: ");
            out.push_str(&text);
        }
        parent = text;
        source = cause.source();
    }
    out
}
