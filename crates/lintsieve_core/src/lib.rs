//! # lintsieve_core
//!
//! Core engine for lintsieve.
//!
//! This crate provides:
//! - The main `Linter` orchestrator
//! - Configuration loading
//! - Signed-glob rule matching, per-plugin and per-path
//! - Baseline suppression
//! - File discovery and parallel processing over a content-addressed cache
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintsieve_core::{BaselineFormatter, CheckerRegistry, Linter, LinterConfig};
//!
//! let config = LinterConfig::from_file("lintsieve.json")?;
//! let linter = Linter::new(config, registry, ".")?;
//!
//! let reports = linter.lint_paths(&[])?;
//! for report in &reports {
//!     println!("{}: {} findings", report.display_path, report.findings.len());
//! }
//!
//! let mut baseline = BaselineFormatter::new(std::io::stdout());
//! linter.report(&reports, &mut baseline)?;
//! ```

mod baseline;
mod config;
mod discover;
mod error;
mod exceptions;
pub mod formatters;
mod linter;
pub mod noqa;
mod result;
mod rule_set;
mod rules;
mod source;

pub use baseline::{Baseline, baseline_digest, finding_digest};
pub use config::LinterConfig;
pub use discover::FileFinder;
pub use error::LinterError;
pub use exceptions::{ExceptionSet, ExceptionsConfig, relative_path, resolve_exceptions};
pub use formatters::{BaselineFormatter, Formatter};
pub use linter::{DEFAULT_PLUGIN, Linter};
pub use result::{FileReport, LintSummary, UnitOutcome, WorkUnit};
pub use rule_set::{PluginsConfig, RuleSet, resolve_rules};
pub use rules::{
    ALWAYS_REPORTED, CHECK_ERROR_CODE, Rule, RuleList, SYNTAX_ERROR_CODE, Sign, check_include,
};
pub use source::{SourceFile, SourceFormat};

#[cfg(test)]
pub mod test_utils;

pub use lintsieve_cache::{CacheKey, CacheStore};
pub use lintsieve_plugin::{
    Checker, CheckerRegistry, Finding, FnChecker, PluginDescriptor, PluginError, RawFinding,
    canonical_name, normalize_name,
};
