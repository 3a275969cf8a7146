//! Cache entry types.

use lintsieve_plugin::Finding;
use serde::{Deserialize, Serialize};

use crate::CacheKey;

/// The persisted result of one `(plugin, file, rules)` unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key this entry was stored under.
    pub key: CacheKey,

    /// Raw findings of the check, before any filtering.
    pub findings: Vec<Finding>,

    /// Timestamp when this entry was created.
    pub created_at: u64,
}

impl CacheEntry {
    /// Creates a new cache entry.
    pub fn new(key: CacheKey, findings: Vec<Finding>) -> Self {
        Self {
            key,
            findings,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Checks that this entry was stored under `key`.
    pub fn is_valid(&self, key: &CacheKey) -> bool {
        &self.key == key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn key(content: &[u8]) -> CacheKey {
        CacheKey::derive("pyflakes", &["+*".to_string()], Path::new("/a.py"), content)
    }

    #[test]
    fn test_cache_entry_valid() {
        let entry = CacheEntry::new(key(b"x = 1\n"), vec![]);
        assert!(entry.is_valid(&key(b"x = 1\n")));
        assert!(!entry.is_valid(&key(b"x = 2\n")));
    }

    #[test]
    fn test_cache_entry_created_at() {
        let entry = CacheEntry::new(key(b""), vec![]);
        // created_at should be a reasonable Unix timestamp (after 2020)
        assert!(entry.created_at > 1577836800);
    }

    #[test]
    fn test_cache_entry_deserialization() {
        let json = r#"{
            "key": "abc123",
            "findings": [
                {"code": "F401", "line": 1, "column": 0, "text": "unused", "plugin": "pyflakes"}
            ],
            "created_at": 1700000000
        }"#;

        let entry: CacheEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.key.as_str(), "abc123");
        assert_eq!(entry.findings.len(), 1);
        assert_eq!(entry.findings[0].physical_line, None);
        assert_eq!(entry.created_at, 1700000000);
    }
}
