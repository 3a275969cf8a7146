//! Checkable text of a file.
//!
//! Code embedded in notebooks, Markdown, reStructuredText and YAML test
//! files is extracted elsewhere into a sequence of lines; the format is kept
//! because some codes are meaningless for extracted code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::noqa;

/// Codes that blank-line and import-position checks produce on code
/// stitched together from separate snippets.
const SNIPPET_IGNORED: &[&str] = &["E302", "E303", "E305", "E402"];

/// Container format a file's lines were extracted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    #[default]
    Python,
    Jupyter,
    Markdown,
    Rst,
    Yaml,
}

impl SourceFormat {
    /// Guesses the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ipynb") => Self::Jupyter,
            Some("md") => Self::Markdown,
            Some("rst" | "rest") => Self::Rst,
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Python,
        }
    }

    /// Codes of `plugin` that are never reported for this format.
    pub fn ignored_codes(self, plugin: &str) -> &'static [&'static str] {
        match (self, plugin) {
            (Self::Rst | Self::Yaml, "pycodestyle") => SNIPPET_IGNORED,
            _ => &[],
        }
    }
}

/// A file ready to be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file on disk.
    pub path: PathBuf,
    /// Lines, each keeping its terminator.
    pub lines: Vec<String>,
    /// Format the lines were extracted from.
    pub format: SourceFormat,
}

impl SourceFile {
    /// Creates a source file from already extracted lines.
    pub fn new(path: impl Into<PathBuf>, lines: Vec<String>, format: SourceFormat) -> Self {
        Self {
            path: path.into(),
            lines,
            format,
        }
    }

    /// Creates a source file from text, splitting it into lines.
    pub fn from_text(path: impl Into<PathBuf>, text: &str, format: SourceFormat) -> Self {
        let lines = text.split_inclusive('\n').map(str::to_string).collect();
        Self::new(path, lines, format)
    }

    /// Reads a native source file from disk.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(path, &text, SourceFormat::from_path(path)))
    }

    /// The 1-based `line` without its terminator.
    pub fn physical_line(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.lines
            .get(index)
            .map(|l| l.trim_end_matches(['\n', '\r']))
    }

    /// Whether the file opts out of checking entirely.
    pub fn is_noqa(&self) -> bool {
        noqa::is_file_ignored(&self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case("a.py", SourceFormat::Python)]
    #[case("a.ipynb", SourceFormat::Jupyter)]
    #[case("README.md", SourceFormat::Markdown)]
    #[case("docs/index.rst", SourceFormat::Rst)]
    #[case("docs/index.rest", SourceFormat::Rst)]
    #[case("test-plugin.yml", SourceFormat::Yaml)]
    #[case("test-plugin.yaml", SourceFormat::Yaml)]
    #[case("script", SourceFormat::Python)]
    fn test_from_path(#[case] path: &str, #[case] expected: SourceFormat) {
        assert_eq!(SourceFormat::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_ignored_codes() {
        assert_eq!(
            SourceFormat::Yaml.ignored_codes("pycodestyle"),
            &["E302", "E303", "E305", "E402"]
        );
        assert!(SourceFormat::Yaml.ignored_codes("pyflakes").is_empty());
        assert!(SourceFormat::Markdown.ignored_codes("pycodestyle").is_empty());
        assert!(SourceFormat::Python.ignored_codes("pycodestyle").is_empty());
    }

    #[test]
    fn test_physical_line() {
        let source = SourceFile::from_text("a.py", "import os\r\nprint(y)\n", SourceFormat::Python);

        assert_eq!(source.lines.len(), 2);
        assert_eq!(source.physical_line(1), Some("import os"));
        assert_eq!(source.physical_line(2), Some("print(y)"));
        assert_eq!(source.physical_line(0), None);
        assert_eq!(source.physical_line(3), None);
    }

    #[test]
    fn test_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example.md");
        fs::write(&path, "x = 1\ny = 2").unwrap();

        let source = SourceFile::read(&path).unwrap();

        assert_eq!(source.format, SourceFormat::Markdown);
        assert_eq!(source.lines, vec!["x = 1\n", "y = 2"]);
        assert!(!source.is_noqa());
    }

    #[test]
    fn test_file_level_noqa() {
        let source = SourceFile::from_text("a.py", "# flake8: noqa\nimport os\n", SourceFormat::Python);
        assert!(source.is_noqa());
    }
}
