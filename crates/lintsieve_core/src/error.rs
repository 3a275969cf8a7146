//! Linter error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during linting.
///
/// `Config` and `InvalidRule` are raised while the linter is built, before
/// any check runs. `Check` is only raised when safe mode is off.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed rule string.
    #[error("invalid rule: `{0}`")]
    InvalidRule(String),

    /// A check failed while safe mode was off.
    #[error("Plugin {plugin} failed on {}: {source}", path.display())]
    Check {
        plugin: String,
        path: PathBuf,
        #[source]
        source: lintsieve_plugin::PluginError,
    },

    /// Plugin error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] lintsieve_plugin::PluginError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an invalid rule error.
    pub fn invalid_rule(rule: impl Into<String>) -> Self {
        Self::InvalidRule(rule.into())
    }

    /// Returns true for errors caused by the user's configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidRule(_))
    }
}
