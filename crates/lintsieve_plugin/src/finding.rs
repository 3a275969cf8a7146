//! Finding types produced by check plugins.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A finding as reported by a check, before the host attaches context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawFinding {
    /// Diagnostic code, e.g. `F401`.
    pub code: String,
    /// 1-based line number (0 for file-level findings).
    pub line: u32,
    /// 0-based column.
    pub column: u32,
    /// Human-readable message.
    pub text: String,
}

impl RawFinding {
    /// Creates a new raw finding.
    pub fn new(code: impl Into<String>, line: u32, column: u32, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            line,
            column,
            text: text.into(),
        }
    }

    /// Attaches the reporting plugin and the source line.
    pub fn into_finding(self, plugin: impl Into<String>, physical_line: Option<String>) -> Finding {
        Finding {
            code: self.code,
            line: self.line,
            column: self.column,
            text: self.text,
            physical_line,
            plugin: plugin.into(),
        }
    }
}

/// A finding tied to the plugin that reported it.
///
/// Findings are ordered by `(line, column)` first so merged results from
/// several plugins come out in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Diagnostic code.
    pub code: String,

    /// 1-based line number.
    pub line: u32,

    /// 0-based column.
    pub column: u32,

    /// Message text.
    pub text: String,

    /// The source line the finding points at, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_line: Option<String>,

    /// Canonical name of the reporting plugin.
    pub plugin: String,
}

impl Finding {
    /// Creates a finding without a physical line.
    pub fn new(
        plugin: impl Into<String>,
        code: impl Into<String>,
        line: u32,
        column: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            line,
            column,
            text: text.into(),
            physical_line: None,
            plugin: plugin.into(),
        }
    }

    /// Sets the physical line.
    pub fn with_physical_line(mut self, line: impl Into<String>) -> Self {
        self.physical_line = Some(line.into());
        self
    }
}

impl Ord for Finding {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.column, &self.code, &self.plugin, &self.text)
            .cmp(&(other.line, other.column, &other.code, &other.plugin, &other.text))
    }
}

impl PartialOrd for Finding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_into_finding() {
        let finding = RawFinding::new("F401", 1, 0, "'os' imported but unused")
            .into_finding("pyflakes", Some("import os".to_string()));

        assert_eq!(finding.plugin, "pyflakes");
        assert_eq!(finding.code, "F401");
        assert_eq!(finding.physical_line.as_deref(), Some("import os"));
    }

    #[test]
    fn test_ordering_by_line_then_column() {
        let mut findings = vec![
            Finding::new("pyflakes", "F821", 3, 4, "undefined name"),
            Finding::new("pycodestyle", "E501", 1, 80, "line too long"),
            Finding::new("pyflakes", "F401", 1, 0, "unused import"),
        ];
        findings.sort();

        let order: Vec<_> = findings.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(order, vec!["F401", "E501", "F821"]);
    }

    #[test]
    fn test_serialization_skips_missing_physical_line() {
        let finding = Finding::new("pyflakes", "F401", 1, 0, "unused");
        let json = serde_json::to_string(&finding).unwrap();
        assert!(!json.contains("physical_line"));

        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, finding);
    }
}
