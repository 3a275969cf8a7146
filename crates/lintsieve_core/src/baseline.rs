//! Baseline suppression of already-known findings.
//!
//! A baseline file lists one digest per line. A digest hashes, in this
//! order, the file path (root-relative, without a leading `./`), the
//! stripped source line (or the line number when the line is unknown) and
//! the code. Regenerating a baseline for unchanged files yields the same
//! digests, and line-number shifts do not invalidate entries that carry
//! their source line.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lintsieve_plugin::Finding;
use tracing::info;

use crate::LinterError;

/// Computes the baseline digest of a finding.
pub fn baseline_digest(path: &str, context: Option<&str>, code: &str, line: u32) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(strip_dot_slash(path).as_bytes());
    let context = match context {
        Some(context) if !context.is_empty() => context.trim().to_string(),
        _ => line.to_string(),
    };
    hasher.update(context.as_bytes());
    hasher.update(code.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Computes the baseline digest of `finding` reported for `path`.
pub fn finding_digest(path: &str, finding: &Finding) -> String {
    baseline_digest(
        path,
        finding.physical_line.as_deref(),
        &finding.code,
        finding.line,
    )
}

fn strip_dot_slash(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}

/// A set of digests loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    digests: HashSet<String>,
}

impl Baseline {
    /// Loads a baseline file. An unreadable file is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!(
                "Failed to read baseline {}: {}",
                path.display(),
                e
            ))
        })?;
        let baseline = Self::from_digests(content.lines());
        info!(
            "Loaded {} baseline digests from {}",
            baseline.len(),
            path.display()
        );
        Ok(baseline)
    }

    /// Builds a baseline from digests, ignoring blank lines.
    pub fn from_digests<I, S>(digests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            digests: digests
                .into_iter()
                .map(|d| d.as_ref().trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Set membership test.
    pub fn contains(&self, digest: &str) -> bool {
        self.digests.contains(digest)
    }

    /// Whether `finding` reported for `path` is in the baseline.
    pub fn is_baselined(&self, path: &str, finding: &Finding) -> bool {
        !self.digests.is_empty() && self.contains(&finding_digest(path, finding))
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}
