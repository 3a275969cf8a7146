//! Cache key derivation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifies the result of running one plugin over one file under one
/// effective rule list.
///
/// The key covers the file content, not its mtime, so touching a file or
/// clock skew never produces a stale hit. It also covers the rule list, so
/// editing the configuration invalidates old entries without versioning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a `(plugin, rules, path, content)` unit.
    pub fn derive(plugin: &str, rules: &[String], abs_path: &Path, content: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(plugin.as_bytes());
        // a JSON array keeps rule boundaries unambiguous
        let rules = serde_json::to_string(rules).unwrap_or_default();
        hasher.update(rules.as_bytes());
        hasher.update(abs_path.to_string_lossy().as_bytes());
        hasher.update(content);
        Self(hasher.finalize().to_hex().to_string())
    }

    /// Hex representation of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry holding this key.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
