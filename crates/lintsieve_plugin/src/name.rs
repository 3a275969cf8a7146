//! Plugin name canonicalization.
//!
//! Users configure plugins by the name of the distribution that ships them,
//! but a plugin announces itself with its entry-point name and the module
//! it lives in. Neither reliably matches the distribution name, so the
//! canonical name is picked from both.

use serde::{Deserialize, Serialize};

/// Fallback name for a plugin that did not announce any name.
pub const UNKNOWN_PLUGIN: &str = "unknown";

/// Hand-curated names for plugins whose entry point disagrees with the
/// distribution name.
const ALIASES: &[(&str, &str)] = &[
    ("flake-mutable", "flake8-mutable"),
    ("pyflakes", "pyflakes"),
    ("naming", "pep8-naming"),
    ("logging-format", "flake8-logging-format"),
];

/// Lower-cases `name` and collapses every run of `-`, `_` and `.` into one `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
                in_separator = true;
            }
            continue;
        }
        in_separator = false;
        normalized.extend(ch.to_lowercase());
    }
    normalized
}

/// Resolves the canonical plugin name.
///
/// Lookup order:
///
/// 1. The alias table, keyed by the raw name.
/// 2. A normalized name (raw, then module) starting with `flake8`.
/// 3. A normalized name starting with `pep8`.
/// 4. The normalized raw name.
pub fn canonical_name(raw_name: &str, module: &str) -> String {
    if raw_name.is_empty() && module.is_empty() {
        return UNKNOWN_PLUGIN.to_string();
    }
    if let Some((_, alias)) = ALIASES.iter().find(|(name, _)| *name == raw_name) {
        return (*alias).to_string();
    }

    let names = [normalize_name(raw_name), normalize_name(module)];
    for prefix in ["flake8", "pep8"] {
        if let Some(name) = names.iter().find(|name| name.starts_with(prefix)) {
            return name.clone();
        }
    }

    if names[0].is_empty() {
        return names[1].clone();
    }
    names[0].clone()
}

/// Identity of a discovered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginDescriptor {
    canonical_name: String,
    raw_name: String,
    module: String,
}

impl PluginDescriptor {
    /// Creates a descriptor and derives its canonical name.
    pub fn new(raw_name: impl Into<String>, module: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        let module = module.into();
        Self {
            canonical_name: canonical_name(&raw_name, &module),
            raw_name,
            module,
        }
    }

    /// The name all configuration lookups use.
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// The entry-point name the plugin announced.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// The module the plugin lives in.
    pub fn module(&self) -> &str {
        &self.module
    }
}
