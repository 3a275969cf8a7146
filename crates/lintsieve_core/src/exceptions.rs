//! Per-path rule overrides.
//!
//! `exceptions` maps a path pattern to a nested `plugins` map. Patterns are
//! tried longest first. All literal prefixes are tried before any glob, so a
//! short literal prefix beats a long glob that also matches; globs are only
//! consulted when no prefix applies.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Component, Path};

use globset::GlobMatcher;

use crate::LinterError;
use crate::rule_set::{PluginsConfig, RuleSet, is_glob};
use crate::rules::compile_glob;

/// Raw `exceptions` configuration: path pattern to a `plugins` map.
pub type ExceptionsConfig = BTreeMap<String, PluginsConfig>;

/// Formats `path` relative to `root` with forward slashes and no `./`.
///
/// A relative `path` is taken relative to `root`, and a relative `root`
/// relative to the working directory. Paths outside `root` keep their
/// full form.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let full = root.join(path);
    let path = full.strip_prefix(&root).unwrap_or(&full);
    let mut absolute = false;
    let mut parts: Vec<Cow<'_, str>> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::ParentDir => parts.push(Cow::Borrowed("..")),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => absolute = true,
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

#[derive(Debug, Clone)]
struct ExceptionEntry {
    pattern: String,
    glob: Option<GlobMatcher>,
    plugins: RuleSet,
    raw: PluginsConfig,
}

/// Compiled `exceptions` configuration.
#[derive(Debug, Clone, Default)]
pub struct ExceptionSet {
    /// Sorted by descending pattern length; equal lengths keep map order.
    entries: Vec<ExceptionEntry>,
}

impl ExceptionSet {
    /// Compiles every path pattern and nested rule set.
    pub fn compile(config: &ExceptionsConfig) -> Result<Self, LinterError> {
        let mut entries = config
            .iter()
            .map(|(pattern, plugins)| {
                let glob = if is_glob(pattern) {
                    Some(compile_glob(pattern).map_err(|e| {
                        LinterError::config(format!("Invalid path pattern '{}': {}", pattern, e))
                    })?)
                } else {
                    None
                };
                Ok(ExceptionEntry {
                    pattern: pattern.clone(),
                    glob,
                    plugins: RuleSet::compile(plugins)?,
                    raw: plugins.clone(),
                })
            })
            .collect::<Result<Vec<_>, LinterError>>()?;
        entries.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        Ok(Self { entries })
    }

    fn find(&self, rel_path: &str) -> Option<&ExceptionEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.glob.is_none())
            .find(|entry| rel_path.starts_with(&entry.pattern))
            .or_else(|| {
                self.entries.iter().find(|entry| {
                    entry
                        .glob
                        .as_ref()
                        .is_some_and(|glob| glob.is_match(rel_path))
                })
            })
    }

    /// Finds the overrides for a root-relative, forward-slash path.
    pub fn resolve(&self, rel_path: &str) -> Option<&RuleSet> {
        self.find(rel_path).map(|entry| &entry.plugins)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finds the raw `plugins` overrides for `path` from a raw `exceptions` map.
///
/// Returns an empty map when no pattern applies.
pub fn resolve_exceptions(
    path: &Path,
    config: &ExceptionsConfig,
    root: &Path,
) -> Result<PluginsConfig, LinterError> {
    let rel_path = relative_path(path, root);
    Ok(ExceptionSet::compile(config)?
        .find(&rel_path)
        .map(|entry| entry.raw.clone())
        .unwrap_or_default())
}
