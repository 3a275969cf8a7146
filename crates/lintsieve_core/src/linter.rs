//! Core linter engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use lintsieve_cache::CacheStore;
use lintsieve_plugin::{CheckerRegistry, Finding, run_checker};

use crate::baseline::Baseline;
use crate::config::LinterConfig;
use crate::discover::FileFinder;
use crate::error::LinterError;
use crate::exceptions::{ExceptionSet, relative_path};
use crate::formatters::Formatter;
use crate::noqa;
use crate::result::{FileReport, LintSummary, UnitOutcome, WorkUnit};
use crate::rule_set::RuleSet;
use crate::rules::{CHECK_ERROR_CODE, RuleList};
use crate::source::SourceFile;

/// Plugin that file-level errors are attributed to.
pub const DEFAULT_PLUGIN: &str = "pycodestyle";

/// The core linter engine.
///
/// Plans one unit per (file, plugin), skips units no rule enables, reuses
/// cached findings and runs the rest in parallel. Configuration is compiled
/// once in [`Linter::new`] and shared read-only by every unit.
pub struct Linter {
    /// Linter configuration.
    config: LinterConfig,
    /// Directory paths are reported relative to.
    root: PathBuf,
    /// Checks by canonical name.
    registry: CheckerRegistry,
    /// Compiled `plugins`.
    rule_set: RuleSet,
    /// Compiled `exceptions`.
    exceptions: ExceptionSet,
    /// Digests of findings to hide.
    baseline: Baseline,
    /// Cache of raw findings per unit.
    cache: CacheStore,
    /// File discovery filters.
    finder: FileFinder,
}

impl Linter {
    /// Creates a new linter, validating every rule before any check runs.
    pub fn new(
        config: LinterConfig,
        registry: CheckerRegistry,
        root: impl Into<PathBuf>,
    ) -> Result<Self, LinterError> {
        let root = std::path::absolute(root.into())?;
        let rule_set = RuleSet::compile(&config.plugins)?;
        let exceptions = ExceptionSet::compile(&config.exceptions)?;
        let finder = FileFinder::new(&config.filename, &config.exclude)?;

        let baseline = match config.baseline_path() {
            Some(path) => Baseline::load(root.join(path))?,
            None => Baseline::default(),
        };

        let mut cache = CacheStore::new(
            root.join(config.resolved_cache_dir()),
            Duration::from_secs(config.cache_ttl),
        );
        if !config.cache {
            cache.disable();
        }

        debug!(
            "Linter ready: {} checkers, {} plugin patterns, {} exception patterns",
            registry.len(),
            config.plugins.len(),
            config.exceptions.len()
        );

        Ok(Self {
            config,
            root,
            registry,
            rule_set,
            exceptions,
            baseline,
            cache,
            finder,
        })
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Formats `path` the way it is shown and matched against exceptions.
    pub fn display_path(&self, path: &Path) -> String {
        relative_path(path, &self.root)
    }

    /// The rules applying to `plugin` for a file: the global list followed
    /// by the path-specific one, so path rules win on conflicts.
    pub fn effective_rules(&self, plugin: &str, display_path: &str) -> RuleList {
        let mut rules = self.rule_set.resolve(plugin).cloned().unwrap_or_default();
        if let Some(overrides) = self.exceptions.resolve(display_path)
            && let Some(extra) = overrides.resolve(plugin)
        {
            rules.extend(extra);
        }
        rules
    }

    /// Plans one unit per registered checker for `source`.
    pub fn plan(&self, source: &SourceFile) -> Vec<WorkUnit> {
        let display_path = self.display_path(&source.path);
        let empty = source.lines.is_empty();
        let file_noqa = !self.config.disable_noqa && source.is_noqa();
        if empty {
            debug!("Skipping {}: empty file", display_path);
        } else if file_noqa {
            debug!("Skipping {}: file-level noqa", display_path);
        }
        let whole_file = empty || file_noqa;

        self.registry
            .names()
            .map(|plugin| {
                let rules = self.effective_rules(plugin, &display_path);
                let skipped = whole_file || rules.excludes_everything();
                if skipped && !whole_file {
                    debug!("Skipping {} on {}: no rule enables it", plugin, display_path);
                }
                WorkUnit {
                    plugin: plugin.to_string(),
                    rules,
                    skipped,
                }
            })
            .collect()
    }

    /// Lints already loaded files.
    ///
    /// Returns one report per source, in input order. Fails on the first
    /// check failure unless safe mode is on.
    pub fn lint_sources(&self, sources: &[SourceFile]) -> Result<Vec<FileReport>, LinterError> {
        match self.cache.prepare() {
            Ok(0) => {}
            Ok(removed) => debug!("Removed {} stale cache entries", removed),
            Err(e) => warn!("Failed to prepare cache: {}", e),
        }

        let plans: Vec<Vec<WorkUnit>> = sources.iter().map(|source| self.plan(source)).collect();

        let jobs: Vec<(usize, usize)> = plans
            .iter()
            .enumerate()
            .flat_map(|(file, units)| {
                units
                    .iter()
                    .enumerate()
                    .filter(|(_, unit)| !unit.skipped)
                    .map(move |(index, _)| (file, index))
            })
            .collect();

        // Units are independent; each touches only its own cache entry.
        let results: Vec<(usize, usize, Vec<Finding>, UnitOutcome)> = jobs
            .into_par_iter()
            .map(|(file, index)| -> Result<_, LinterError> {
                let (findings, outcome) = self.run_unit(&sources[file], &plans[file][index])?;
                Ok((file, index, findings, outcome))
            })
            .collect::<Result<Vec<_>, LinterError>>()?;

        let mut reports: Vec<FileReport> = sources
            .iter()
            .zip(&plans)
            .map(|(source, units)| {
                let mut report =
                    FileReport::new(source.path.clone(), self.display_path(&source.path));
                report.outcomes = units
                    .iter()
                    .map(|unit| (unit.plugin.clone(), UnitOutcome::Skipped))
                    .collect();
                report
            })
            .collect();

        for (file, index, findings, outcome) in results {
            let source = &sources[file];
            let unit = &plans[file][index];
            let report = &mut reports[file];
            report.outcomes[index].1 = outcome;
            report.found += findings.len();
            report
                .findings
                .extend(self.filter(source, &report.display_path, unit, findings));
        }

        for report in &mut reports {
            report.findings.sort();
        }

        Ok(reports)
    }

    /// Discovers and lints files under `arguments`, relative to the root.
    ///
    /// A file that cannot be read is reported as a single `E902` finding.
    pub fn lint_paths(&self, arguments: &[PathBuf]) -> Result<Vec<FileReport>, LinterError> {
        let paths = self.finder.discover_files(arguments, &self.root);

        let mut sources = Vec::new();
        let mut unreadable = Vec::new();
        for (position, path) in paths.iter().enumerate() {
            match SourceFile::read(path) {
                Ok(source) => sources.push(source),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    let mut report = FileReport::new(path.clone(), self.display_path(path));
                    report.findings.push(Finding::new(
                        DEFAULT_PLUGIN,
                        CHECK_ERROR_CODE,
                        0,
                        0,
                        format!("{:?}: {}", e.kind(), e),
                    ));
                    report.found = 1;
                    unreadable.push((position, report));
                }
            }
        }

        let mut reports = self.lint_sources(&sources)?;
        for (position, report) in unreadable {
            reports.insert(position, report);
        }

        let summary = LintSummary::from_reports(&reports);
        info!(
            "Linted {} files: {} findings, {} filtered, {} cached units, {} executed, {} skipped",
            summary.files_checked,
            summary.total_findings,
            summary.filtered,
            summary.cache_hits,
            summary.executed,
            summary.skipped
        );

        Ok(reports)
    }

    /// Feeds every finding of `reports` into `formatter`.
    ///
    /// Returns the number of findings reported.
    pub fn report(
        &self,
        reports: &[FileReport],
        formatter: &mut dyn Formatter,
    ) -> Result<usize, LinterError> {
        let mut reported = 0;
        for report in reports {
            for finding in &report.findings {
                formatter.handle(&report.display_path, finding)?;
                reported += 1;
            }
        }
        formatter.finish()?;
        Ok(reported)
    }

    /// Runs one unit, or serves it from the cache.
    fn run_unit(
        &self,
        source: &SourceFile,
        unit: &WorkUnit,
    ) -> Result<(Vec<Finding>, UnitOutcome), LinterError> {
        let abs_path = self.root.join(&source.path);
        let key = self
            .cache
            .key_for(&unit.plugin, &unit.rules.to_strings(), &abs_path);

        if let Some(key) = &key
            && let Some(findings) = self.cache.lookup(key)
        {
            debug!(
                "Using cached result of {} for {}",
                unit.plugin,
                source.path.display()
            );
            return Ok((findings, UnitOutcome::CacheHit));
        }

        let checker = self.registry.get(&unit.plugin)?;
        debug!("Running {} on {}", unit.plugin, source.path.display());

        let findings = match run_checker(&**checker, &source.lines) {
            Ok(raw) => {
                let mut findings: Vec<Finding> = raw
                    .into_iter()
                    .map(|raw| {
                        let physical_line = source.physical_line(raw.line).map(str::to_string);
                        raw.into_finding(unit.plugin.as_str(), physical_line)
                    })
                    .collect();
                findings.sort();

                if let Some(key) = &key
                    && let Err(e) = self.cache.store(key, &findings)
                {
                    warn!("Failed to save cache entry {}: {}", key, e);
                }
                findings
            }
            // Failures are not cached: the next run retries the check.
            Err(e) if self.config.safe => {
                warn!(
                    "Plugin {} failed on {}: {}",
                    unit.plugin,
                    source.path.display(),
                    e
                );
                vec![Finding::new(
                    unit.plugin.as_str(),
                    CHECK_ERROR_CODE,
                    0,
                    0,
                    format!("{}: {}", e.kind(), e.message()),
                )]
            }
            Err(e) => {
                return Err(LinterError::Check {
                    plugin: unit.plugin.clone(),
                    path: source.path.clone(),
                    source: e,
                });
            }
        };

        Ok((findings, UnitOutcome::Executed))
    }

    /// Drops findings by format, baseline, rules and inline `# noqa`, in
    /// that order.
    fn filter(
        &self,
        source: &SourceFile,
        display_path: &str,
        unit: &WorkUnit,
        findings: Vec<Finding>,
    ) -> Vec<Finding> {
        let ignored = source.format.ignored_codes(&unit.plugin);
        findings
            .into_iter()
            .filter(|finding| !ignored.contains(&finding.code.as_str()))
            .filter(|finding| !self.baseline.is_baselined(display_path, finding))
            .filter(|finding| unit.rules.includes(&finding.code))
            .filter(|finding| self.config.disable_noqa || !noqa::is_inline_ignored(finding))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubChecker, config_with, registry_of};
    use lintsieve_plugin::RawFinding;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    fn linter(config: LinterConfig) -> (Linter, StubChecker, StubChecker) {
        let pyflakes = StubChecker::new(
            "pyflakes",
            vec![
                RawFinding::new("F401", 1, 0, "'os' imported but unused"),
                RawFinding::new("F821", 2, 6, "undefined name 'y'"),
            ],
        );
        let pycodestyle = StubChecker::new(
            "pycodestyle",
            vec![RawFinding::new("E302", 2, 0, "expected 2 blank lines, found 0")],
        );
        let registry = registry_of(&[&pyflakes, &pycodestyle]);
        let linter = Linter::new(config, registry, "/project").unwrap();
        (linter, pyflakes, pycodestyle)
    }

    fn source(path: &str, text: &str) -> SourceFile {
        SourceFile::from_text(path, text, crate::SourceFormat::from_path(Path::new(path)))
    }

    #[test]
    fn test_effective_rules_appends_exceptions() {
        let mut config = config_with(&[("pyflakes", &["+*"])]);
        config.exceptions.insert(
            "tests/".to_string(),
            [("pyflakes".to_string(), vec!["-F401".to_string()])].into(),
        );
        let (linter, _, _) = linter(config);

        assert_eq!(
            linter.effective_rules("pyflakes", "tests/test_a.py").to_strings(),
            vec!["+*", "-F401"]
        );
        assert_eq!(
            linter.effective_rules("pyflakes", "a.py").to_strings(),
            vec!["+*"]
        );
        assert!(linter.effective_rules("pycodestyle", "a.py").is_empty());
    }

    #[test]
    fn test_plan_marks_units_without_rules_skipped() {
        let config = config_with(&[("pyflakes", &["+*"]), ("pycodestyle", &["-*"])]);
        let (linter, _, _) = linter(config);

        let units = linter.plan(&source("a.py", "import os\n"));

        let planned: Vec<(&str, bool)> = units
            .iter()
            .map(|unit| (unit.plugin.as_str(), unit.skipped))
            .collect();
        assert_eq!(planned, vec![("pycodestyle", true), ("pyflakes", false)]);
    }

    #[test]
    fn test_plan_skips_everything_for_noqa_file() {
        let (linter, _, _) = linter(config_with(&[("*", &["+*"])]));
        let units = linter.plan(&source("a.py", "# flake8: noqa\nimport os\n"));
        assert!(units.iter().all(|unit| unit.skipped));
    }

    #[test]
    fn test_empty_file_runs_no_checks() {
        let (linter, pyflakes, pycodestyle) = linter(config_with(&[("*", &["+*"])]));

        let units = linter.plan(&source("a.py", ""));
        assert!(units.iter().all(|unit| unit.skipped));

        let reports = linter.lint_sources(&[source("a.py", "")]).unwrap();
        assert!(reports[0].findings.is_empty());
        assert_eq!(reports[0].count(UnitOutcome::Skipped), 2);
        assert_eq!(pyflakes.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pycodestyle.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disable_noqa_runs_noqa_file() {
        let mut config = config_with(&[("*", &["+*"])]);
        config.disable_noqa = true;
        let (linter, _, _) = linter(config);
        let units = linter.plan(&source("a.py", "# flake8: noqa\nimport os\n"));
        assert!(units.iter().all(|unit| !unit.skipped));
    }

    #[test]
    fn test_lint_sources_filters_and_sorts() {
        let config = config_with(&[("pyflakes", &["+*", "-F401"]), ("pycodestyle", &["+*"])]);
        let (linter, pyflakes, pycodestyle) = linter(config);

        let reports = linter
            .lint_sources(&[source("a.py", "import os\nprint(y)\n")])
            .unwrap();

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.display_path, "a.py");
        assert_eq!(report.codes(), vec!["E302", "F821"]);
        assert_eq!(report.found, 3);
        assert_eq!(report.findings[1].physical_line.as_deref(), Some("print(y)"));
        assert_eq!(report.outcome("pyflakes"), Some(UnitOutcome::Executed));
        assert_eq!(pyflakes.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pycodestyle.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inline_noqa_is_honored() {
        let config = config_with(&[("pyflakes", &["+*"])]);
        let (linter, _, _) = linter(config);

        let reports = linter
            .lint_sources(&[source("a.py", "import os  # noqa: F401\nprint(y)\n")])
            .unwrap();

        assert_eq!(reports[0].codes(), vec!["F821"]);
    }

    #[test]
    fn test_format_ignore_list() {
        let config = config_with(&[("pycodestyle", &["+*"])]);
        let (linter, _, _) = linter(config);

        let reports = linter
            .lint_sources(&[
                source("docs/index.rst", "import os\nprint(y)\n"),
                source("README.md", "import os\nprint(y)\n"),
            ])
            .unwrap();

        assert!(reports[0].findings.is_empty());
        assert_eq!(reports[0].found, 1);
        assert_eq!(reports[1].codes(), vec!["E302"]);
    }

    #[test]
    fn test_baseline_filters_findings() {
        let (mut linter, _, _) = linter(config_with(&[("pyflakes", &["+*"])]));
        linter.baseline = Baseline::from_digests([crate::baseline_digest(
            "a.py",
            Some("print(y)"),
            "F821",
            2,
        )]);

        let reports = linter
            .lint_sources(&[source("a.py", "import os\nprint(y)\n")])
            .unwrap();

        assert_eq!(reports[0].codes(), vec!["F401"]);
        assert_eq!(reports[0].found, 2);
    }

    #[test]
    fn test_report_feeds_formatter() {
        let config = config_with(&[("pyflakes", &["+*"])]);
        let (linter, _, _) = linter(config);
        let reports = linter
            .lint_sources(&[source("a.py", "import os\nprint(y)\n")])
            .unwrap();

        let mut formatter = crate::test_utils::CollectingFormatter::default();
        let reported = linter.report(&reports, &mut formatter).unwrap();

        assert_eq!(reported, 2);
        assert!(formatter.finished);
        assert_eq!(
            formatter.seen,
            vec![
                ("a.py".to_string(), "F401".to_string()),
                ("a.py".to_string(), "F821".to_string()),
            ]
        );
    }
}
