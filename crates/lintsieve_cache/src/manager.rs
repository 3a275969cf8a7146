//! On-disk cache store with one file per key.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use lintsieve_plugin::Finding;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{CacheEntry, CacheError, CacheKey};

/// Entries not accessed for this long are evicted by [`CacheStore::gc`].
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600 * 24);

/// Persists check results keyed by [`CacheKey`].
///
/// Every key lives in its own file, so lookups and stores for different keys
/// never contend and the store can be shared across worker threads as-is.
/// Storing an existing key overwrites it with identical content.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache entries are stored.
    dir: PathBuf,
    /// Entries older than this (since last access) are evicted.
    ttl: Duration,
    /// Whether the cache is enabled.
    enabled: bool,
}

impl CacheStore {
    /// Creates a new cache store.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory to store cache entries
    /// * `ttl` - Time since last access after which entries are evicted
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            enabled: true,
        }
    }

    /// Disables caching.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Returns whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Eviction threshold.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the entry for `key`.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Derives the key for a unit by reading the file's current content.
    ///
    /// Returns `None` when the file cannot be read from disk (for example
    /// stdin); such units are never cached.
    pub fn key_for(&self, plugin: &str, rules: &[String], abs_path: &Path) -> Option<CacheKey> {
        if !self.enabled {
            return None;
        }
        match fs::read(abs_path) {
            Ok(content) => Some(CacheKey::derive(plugin, rules, abs_path, &content)),
            Err(e) => {
                debug!("Not caching {}: {}", abs_path.display(), e);
                None
            }
        }
    }

    /// Looks up the findings stored for `key`.
    ///
    /// Missing, unreadable and corrupted entries are all reported as a miss.
    pub fn lookup(&self, key: &CacheKey) -> Option<Vec<Finding>> {
        if !self.enabled {
            return None;
        }
        match self.read_entry(key) {
            Ok(Some(entry)) => {
                self.touch(key);
                Some(entry.findings)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Ignoring cache entry {}: {}", key, e);
                None
            }
        }
    }

    fn read_entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::read(path, e)),
        };
        let entry: CacheEntry = serde_json::from_slice(&content)?;
        if !entry.is_valid(key) {
            return Err(CacheError::corrupted(format!(
                "{} holds key {}",
                path.display(),
                entry.key
            )));
        }
        Ok(Some(entry))
    }

    /// Refreshes the entry's modification time so GC sees the access even on
    /// filesystems mounted with `noatime`.
    fn touch(&self, key: &CacheKey) {
        let path = self.entry_path(key);
        let result = fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_modified(SystemTime::now()));
        if let Err(e) = result {
            debug!("Failed to touch {}: {}", path.display(), e);
        }
    }

    /// Stores the findings for `key`, replacing any previous entry atomically.
    pub fn store(&self, key: &CacheKey, findings: &[Finding]) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;

        let entry = CacheEntry::new(key.clone(), findings.to_vec());
        let bytes = serde_json::to_vec(&entry)?;

        let path = self.entry_path(key);
        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|e| CacheError::write(&path, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| CacheError::write(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| CacheError::write(&path, e.error))?;

        debug!("Stored {} findings under {}", findings.len(), key);
        Ok(())
    }

    /// Creates the cache directory, or runs [`Self::gc`] if it already exists.
    ///
    /// Returns the number of evicted entries.
    pub fn prepare(&self) -> Result<usize, CacheError> {
        if !self.enabled {
            return Ok(0);
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            return Ok(0);
        }
        self.gc()
    }

    /// Removes entries whose last access is older than the TTL.
    ///
    /// Returns the number of evicted entries.
    pub fn gc(&self) -> Result<usize, CacheError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for dir_entry in read_dir {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            let Some(last_access) = last_access(&metadata) else {
                continue;
            };
            let age = now.duration_since(last_access).unwrap_or(Duration::ZERO);
            if age <= self.ttl {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                // another process may have evicted it first
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if removed > 0 {
            info!(
                "Evicted {} cache entries from {}",
                removed,
                self.dir.display()
            );
        }
        Ok(removed)
    }

    /// Returns the number of persisted entries.
    pub fn len(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|read_dir| {
                read_dir
                    .filter_map(Result::ok)
                    .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Returns true if no entry is persisted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn last_access(metadata: &fs::Metadata) -> Option<SystemTime> {
    match (metadata.accessed().ok(), metadata.modified().ok()) {
        (Some(accessed), Some(modified)) => Some(accessed.max(modified)),
        (accessed, modified) => accessed.or(modified),
    }
}
