//! Registry of discovered check plugins.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::{Checker, PluginError};

/// Plugins keyed by canonical name, iterated in name order.
///
/// # Example
///
/// ```rust,ignore
/// use lintsieve_plugin::{CheckerRegistry, FnChecker, PluginDescriptor};
///
/// let mut registry = CheckerRegistry::new();
/// registry.register(FnChecker::new(PluginDescriptor::new("pyflakes", "pyflakes"), run))?;
/// ```
#[derive(Default, Clone)]
pub struct CheckerRegistry {
    checkers: BTreeMap<String, Arc<dyn Checker>>,
}

impl CheckerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a checker under its canonical name.
    pub fn register(&mut self, checker: impl Checker + 'static) -> Result<(), PluginError> {
        self.register_arc(Arc::new(checker))
    }

    /// Registers a shared checker under its canonical name.
    pub fn register_arc(&mut self, checker: Arc<dyn Checker>) -> Result<(), PluginError> {
        let name = checker.canonical_name().to_string();
        if self.checkers.contains_key(&name) {
            return Err(PluginError::Duplicate(name));
        }
        debug!("Registered plugin {}", name);
        self.checkers.insert(name, checker);
        Ok(())
    }

    /// Looks up a checker by canonical name.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Checker>, PluginError> {
        self.checkers
            .get(name)
            .ok_or_else(|| PluginError::not_found(name))
    }

    /// Iterates over `(canonical name, checker)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Checker>)> {
        self.checkers.iter().map(|(name, checker)| (name.as_str(), checker))
    }

    /// Canonical names of all registered plugins.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checkers.keys().map(String::as_str)
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Returns true if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnChecker, PluginDescriptor};
    use pretty_assertions::assert_eq;

    fn noop(raw: &str, module: &str) -> FnChecker {
        FnChecker::new(PluginDescriptor::new(raw, module), |_| Ok(vec![]))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = CheckerRegistry::new();
        registry.register(noop("pyflakes", "pyflakes")).unwrap();
        registry.register(noop("Q0", "flake8_quotes")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("flake8-quotes").is_ok());
        assert!(matches!(
            registry.get("Q0"),
            Err(PluginError::NotFound(_))
        ));
    }

    #[test]
    fn test_iteration_is_sorted_by_name() {
        let mut registry = CheckerRegistry::new();
        registry.register(noop("pyflakes", "pyflakes")).unwrap();
        registry.register(noop("mccabe", "mccabe")).unwrap();
        registry.register(noop("Q0", "flake8_quotes")).unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["flake8-quotes", "mccabe", "pyflakes"]);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = CheckerRegistry::new();
        registry.register(noop("pyflakes", "pyflakes")).unwrap();
        let err = registry.register(noop("pyflakes", "other")).unwrap_err();
        assert!(matches!(err, PluginError::Duplicate(name) if name == "pyflakes"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = CheckerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }
}
