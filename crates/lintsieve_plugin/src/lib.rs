//! # lintsieve_plugin
//!
//! Check plugin interface for lintsieve.
//!
//! This crate provides:
//! - The `Checker` trait implemented by every check plugin
//! - Plugin name canonicalization
//! - The plugin registry
//! - Finding types
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintsieve_plugin::{CheckerRegistry, FnChecker, PluginDescriptor, RawFinding};
//!
//! let mut registry = CheckerRegistry::new();
//! registry.register(FnChecker::new(
//!     PluginDescriptor::new("T", "flake8_todo"),
//!     |lines| Ok(vec![RawFinding::new("T001", 1, 0, "todo found")]),
//! ))?;
//! ```

mod checker;
mod error;
mod finding;
mod name;
mod registry;

pub use checker::{Checker, FnChecker, run_checker};
pub use error::PluginError;
pub use finding::{Finding, RawFinding};
pub use name::{PluginDescriptor, UNKNOWN_PLUGIN, canonical_name, normalize_name};
pub use registry::CheckerRegistry;
