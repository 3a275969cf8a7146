//! Selection of the rule list that applies to a plugin.
//!
//! Configuration keys are plugin names or plugin-name globs:
//!
//! 1. A non-glob key equal to the plugin name (after normalization) wins.
//! 2. Otherwise the longest glob key matching the name wins (nginx-style).
//! 3. Otherwise the plugin has no rules and never runs.

use std::collections::BTreeMap;

use globset::GlobMatcher;
use lintsieve_plugin::normalize_name;

use crate::LinterError;
use crate::rules::{RuleList, compile_glob};

/// Raw `plugins` configuration: pattern to rule strings.
pub type PluginsConfig = BTreeMap<String, Vec<String>>;

/// Only `*` makes a key a glob; `?` and `[` are literal in key names.
pub(crate) fn is_glob(pattern: &str) -> bool {
    pattern.contains('*')
}

#[derive(Debug, Clone)]
struct RuleSetEntry {
    pattern: String,
    normalized: String,
    glob: Option<GlobMatcher>,
    rules: RuleList,
}

/// Compiled `plugins` configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<RuleSetEntry>,
}

impl RuleSet {
    /// Compiles every pattern and rule list, failing on the first malformed one.
    pub fn compile(config: &PluginsConfig) -> Result<Self, LinterError> {
        let entries = config
            .iter()
            .map(|(pattern, rules)| {
                let normalized = normalize_name(pattern);
                let glob = if is_glob(pattern) {
                    Some(compile_glob(&normalized).map_err(|e| {
                        LinterError::config(format!("Invalid plugin pattern '{}': {}", pattern, e))
                    })?)
                } else {
                    None
                };
                Ok(RuleSetEntry {
                    pattern: pattern.clone(),
                    normalized,
                    glob,
                    rules: RuleList::parse(rules)?,
                })
            })
            .collect::<Result<Vec<_>, LinterError>>()?;
        Ok(Self { entries })
    }

    /// Finds the rules for `plugin`, or `None` when no key applies.
    pub fn resolve(&self, plugin: &str) -> Option<&RuleList> {
        let name = normalize_name(plugin);

        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.glob.is_none() && entry.normalized == name)
        {
            return Some(&entry.rules);
        }

        let mut best: Option<&RuleSetEntry> = None;
        for entry in &self.entries {
            let Some(glob) = &entry.glob else {
                continue;
            };
            if !glob.is_match(&name) {
                continue;
            }
            // strictly longer wins, so ties keep the first key in map order
            if best.is_none_or(|b| entry.pattern.len() > b.pattern.len()) {
                best = Some(entry);
            }
        }
        best.map(|entry| &entry.rules)
    }

    /// Patterns in configuration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.pattern.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves the raw rule strings for `plugin` from a raw `plugins` map.
///
/// Returns an empty list when nothing applies.
pub fn resolve_rules(plugin: &str, config: &PluginsConfig) -> Result<Vec<String>, LinterError> {
    Ok(RuleSet::compile(config)?
        .resolve(plugin)
        .map(RuleList::to_strings)
        .unwrap_or_default())
}
