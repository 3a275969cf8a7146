//! # lintsieve_cache
//!
//! Result cache for lintsieve.
//!
//! This crate avoids re-running a plugin over a file it has already checked.
//!
//! ## Cache Strategy
//!
//! 1. **Content-addressed**: the key hashes the file's bytes, never its mtime
//! 2. **Config-aware**: the key hashes the effective rule list of the unit
//! 3. **Per-plugin**: every `(plugin, file)` unit has its own entry
//!
//! ## Storage
//!
//! One JSON file per key under the cache directory, written atomically.
//! Entries not accessed within the TTL are removed by `CacheStore::gc`.

mod entry;
mod error;
mod key;
mod manager;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use key::CacheKey;
pub use manager::{CacheStore, DEFAULT_TTL};
