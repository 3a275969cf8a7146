//! Lint result types.

use std::path::PathBuf;

use lintsieve_plugin::Finding;

use crate::rules::RuleList;

/// What happened to one (file, plugin) unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOutcome {
    /// No rule enables the plugin for this file; the check never ran.
    Skipped,
    /// Findings came from the cache.
    CacheHit,
    /// The check ran.
    Executed,
}

/// A planned (file, plugin) unit.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    /// Canonical plugin name.
    pub plugin: String,
    /// Global rules followed by the path-specific ones.
    pub rules: RuleList,
    /// Whether the unit must not run.
    pub skipped: bool,
}

/// Result of linting a single file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Path to the linted file.
    pub path: PathBuf,

    /// Root-relative path with forward slashes, as shown to the user.
    pub display_path: String,

    /// Surviving findings, sorted by position.
    pub findings: Vec<Finding>,

    /// Number of findings before filtering.
    pub found: usize,

    /// Outcome of every unit, by plugin.
    pub outcomes: Vec<(String, UnitOutcome)>,
}

impl FileReport {
    /// Creates a report without findings.
    pub fn new(path: PathBuf, display_path: String) -> Self {
        Self {
            path,
            display_path,
            findings: Vec::new(),
            found: 0,
            outcomes: Vec::new(),
        }
    }

    /// Returns true if there are any findings.
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Outcome of the unit for `plugin`, if it was planned.
    pub fn outcome(&self, plugin: &str) -> Option<UnitOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == plugin)
            .map(|(_, outcome)| *outcome)
    }

    /// Number of units that ended with `outcome`.
    pub fn count(&self, outcome: UnitOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// Codes of the surviving findings, in order.
    pub fn codes(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.code.as_str()).collect()
    }
}

/// Summary of linting multiple files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LintSummary {
    /// Total files processed.
    pub files_checked: usize,

    /// Units served from the cache.
    pub cache_hits: usize,

    /// Units that ran their check.
    pub executed: usize,

    /// Units that were skipped.
    pub skipped: usize,

    /// Total findings reported.
    pub total_findings: usize,

    /// Findings removed by filtering.
    pub filtered: usize,
}

impl LintSummary {
    /// Creates a summary from reports.
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self::default();

        for report in reports {
            summary.files_checked += 1;
            summary.cache_hits += report.count(UnitOutcome::CacheHit);
            summary.executed += report.count(UnitOutcome::Executed);
            summary.skipped += report.count(UnitOutcome::Skipped);
            summary.total_findings += report.findings.len();
            summary.filtered += report.found.saturating_sub(report.findings.len());
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report(outcomes: &[(&str, UnitOutcome)], found: usize, codes: &[&str]) -> FileReport {
        let mut report = FileReport::new(PathBuf::from("/p/a.py"), "a.py".to_string());
        report.outcomes = outcomes
            .iter()
            .map(|(name, outcome)| (name.to_string(), *outcome))
            .collect();
        report.found = found;
        report.findings = codes
            .iter()
            .map(|code| Finding::new("pyflakes", *code, 1, 0, "msg"))
            .collect();
        report
    }

    #[test]
    fn test_file_report_new() {
        let report = FileReport::new(PathBuf::from("a.py"), "a.py".to_string());
        assert!(!report.has_findings());
        assert_eq!(report.found, 0);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_outcome_lookup() {
        let report = report(
            &[
                ("pycodestyle", UnitOutcome::Skipped),
                ("pyflakes", UnitOutcome::CacheHit),
            ],
            0,
            &[],
        );

        assert_eq!(report.outcome("pyflakes"), Some(UnitOutcome::CacheHit));
        assert_eq!(report.outcome("pycodestyle"), Some(UnitOutcome::Skipped));
        assert_eq!(report.outcome("pep8-naming"), None);
    }

    #[test]
    fn test_lint_summary() {
        let reports = vec![
            report(
                &[
                    ("pycodestyle", UnitOutcome::Executed),
                    ("pyflakes", UnitOutcome::Executed),
                ],
                3,
                &["F821"],
            ),
            report(
                &[
                    ("pycodestyle", UnitOutcome::Skipped),
                    ("pyflakes", UnitOutcome::CacheHit),
                ],
                1,
                &["F401"],
            ),
        ];

        let summary = LintSummary::from_reports(&reports);

        assert_eq!(
            summary,
            LintSummary {
                files_checked: 2,
                cache_hits: 1,
                executed: 2,
                skipped: 1,
                total_findings: 2,
                filtered: 2,
            }
        );
    }

    #[test]
    fn test_lint_summary_empty() {
        assert_eq!(LintSummary::from_reports(&[]), LintSummary::default());
    }
}
