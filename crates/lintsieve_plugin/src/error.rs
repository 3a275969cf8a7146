//! Plugin error types.

use thiserror::Error;

/// Errors that can occur while running a check plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The check reported a failure.
    #[error("Check failed: {0}")]
    CallError(String),

    /// The check panicked while running.
    #[error("Check panicked: {0}")]
    Panicked(String),

    /// Plugin not found in the registry.
    #[error("Plugin not found: {0}")]
    NotFound(String),

    /// A plugin with the same canonical name is already registered.
    #[error("Plugin already registered: {0}")]
    Duplicate(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Creates a call error.
    pub fn call(message: impl Into<String>) -> Self {
        Self::CallError(message.into())
    }

    /// Creates a panic error.
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Short name of the failure kind, used as the prefix of synthetic findings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CallError(_) => "CallError",
            Self::Panicked(_) => "Panic",
            Self::NotFound(_) => "NotFound",
            Self::Duplicate(_) => "Duplicate",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IOError",
        }
    }

    /// The bare message without the `Display` prefix.
    pub fn message(&self) -> String {
        match self {
            Self::CallError(m) | Self::Panicked(m) | Self::NotFound(m) | Self::Duplicate(m) => {
                m.clone()
            }
            Self::Serialization(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
        }
    }
}
