use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lintsieve_plugin::{CheckerRegistry, Finding, FnChecker, PluginDescriptor, RawFinding};

use crate::formatters::Formatter;
use crate::{LinterConfig, LinterError};

/// A checker returning fixed findings and counting its calls.
pub struct StubChecker {
    pub name: String,
    pub findings: Vec<RawFinding>,
    pub calls: Arc<AtomicUsize>,
}

impl StubChecker {
    pub fn new(name: &str, findings: Vec<RawFinding>) -> Self {
        Self {
            name: name.to_string(),
            findings,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn checker(&self) -> FnChecker {
        let findings = self.findings.clone();
        let calls = Arc::clone(&self.calls);
        FnChecker::new(PluginDescriptor::new(self.name.as_str(), ""), move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(findings.clone())
        })
    }
}

pub fn registry_of(stubs: &[&StubChecker]) -> CheckerRegistry {
    let mut registry = CheckerRegistry::new();
    for stub in stubs {
        registry.register(stub.checker()).unwrap();
    }
    registry
}

/// Configuration with the given `plugins` and caching off.
pub fn config_with(plugins: &[(&str, &[&str])]) -> LinterConfig {
    LinterConfig {
        plugins: plugins
            .iter()
            .map(|(name, rules)| {
                (
                    name.to_string(),
                    rules.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect::<BTreeMap<_, _>>(),
        cache: false,
        ..LinterConfig::default()
    }
}

/// Records `(path, code)` of every finding it receives.
#[derive(Default)]
pub struct CollectingFormatter {
    pub seen: Vec<(String, String)>,
    pub finished: bool,
}

impl Formatter for CollectingFormatter {
    fn handle(&mut self, path: &str, finding: &Finding) -> Result<(), LinterError> {
        self.seen.push((path.to_string(), finding.code.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), LinterError> {
        self.finished = true;
        Ok(())
    }
}
