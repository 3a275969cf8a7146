//! Check plugin abstraction.
//!
//! A check is an opaque function from a file's lines to raw findings. The
//! host never looks inside it; it only decides whether to call it.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::{PluginDescriptor, PluginError, RawFinding};

/// A check plugin.
pub trait Checker: Send + Sync {
    /// Identity of the plugin.
    fn descriptor(&self) -> &PluginDescriptor;

    /// Runs the check over the lines of one file.
    fn run(&self, lines: &[String]) -> Result<Vec<RawFinding>, PluginError>;

    /// Canonical name used for every configuration lookup.
    fn canonical_name(&self) -> &str {
        self.descriptor().canonical_name()
    }
}

type CheckFn = dyn Fn(&[String]) -> Result<Vec<RawFinding>, PluginError> + Send + Sync;

/// A [`Checker`] backed by a closure.
pub struct FnChecker {
    descriptor: PluginDescriptor,
    check: Box<CheckFn>,
}

impl FnChecker {
    /// Creates a checker from a descriptor and a check function.
    pub fn new<F>(descriptor: PluginDescriptor, check: F) -> Self
    where
        F: Fn(&[String]) -> Result<Vec<RawFinding>, PluginError> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            check: Box::new(check),
        }
    }
}

impl fmt::Debug for FnChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnChecker")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl Checker for FnChecker {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn run(&self, lines: &[String]) -> Result<Vec<RawFinding>, PluginError> {
        (self.check)(lines)
    }
}

/// Runs a checker, turning a panic into [`PluginError::Panicked`].
pub fn run_checker(checker: &dyn Checker, lines: &[String]) -> Result<Vec<RawFinding>, PluginError> {
    match panic::catch_unwind(AssertUnwindSafe(|| checker.run(lines))) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(PluginError::panicked(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_fn_checker_runs_closure() {
        let checker = FnChecker::new(PluginDescriptor::new("T", "flake8_todo"), |lines| {
            Ok(lines
                .iter()
                .enumerate()
                .filter(|(_, l)| l.contains("TODO"))
                .map(|(i, _)| RawFinding::new("T001", i as u32 + 1, 0, "todo found"))
                .collect())
        });

        assert_eq!(checker.canonical_name(), "flake8-todo");
        let findings = checker.run(&lines("a = 1\n# TODO\n")).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn test_run_checker_passes_errors_through() {
        let checker = FnChecker::new(PluginDescriptor::new("x", "x"), |_| {
            Err(PluginError::call("bad input"))
        });
        let err = run_checker(&checker, &[]).unwrap_err();
        assert!(matches!(err, PluginError::CallError(ref m) if m == "bad input"));
    }

    #[test]
    fn test_run_checker_catches_panic() {
        let checker = FnChecker::new(PluginDescriptor::new("x", "x"), |_| panic!("exploded"));
        let err = run_checker(&checker, &[]).unwrap_err();
        assert_eq!(err.kind(), "Panic");
        assert_eq!(err.message(), "exploded");
    }
}
