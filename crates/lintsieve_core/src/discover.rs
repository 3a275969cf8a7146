use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::info;
use walkdir::WalkDir;

use crate::error::LinterError;

/// Expands the paths given on the command line into files to check.
pub struct FileFinder {
    filename_globs: GlobSet,
    exclude_globs: GlobSet,
}

impl FileFinder {
    /// `filename` globs select files inside walked directories; `exclude`
    /// globs prune files and directories by name or by full path.
    pub fn new(filename: &[String], exclude: &[String]) -> Result<Self, LinterError> {
        Ok(Self {
            filename_globs: Self::build_globset(filename)?,
            exclude_globs: Self::build_globset(exclude)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<GlobSet, LinterError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        builder
            .build()
            .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))
    }

    /// Checks if a file or directory is excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_globs.is_match(path) {
            return true;
        }
        path.file_name()
            .is_some_and(|name| self.exclude_globs.is_match(Path::new(name)))
    }

    /// Checks if a file found while walking a directory should be checked.
    pub fn is_selected(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.filename_globs.is_match(Path::new(name)))
    }

    /// Discovers files under `arguments`, resolving relative paths against
    /// `base_dir`.
    ///
    /// Files named explicitly are kept whatever their name, unless excluded.
    /// An empty argument list means `base_dir` itself.
    pub fn discover_files(&self, arguments: &[PathBuf], base_dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let default_argument = [base_dir.to_path_buf()];
        let arguments = if arguments.is_empty() {
            &default_argument[..]
        } else {
            arguments
        };

        for argument in arguments {
            let argument = base_dir.join(argument);
            if argument.is_dir() {
                let walker = WalkDir::new(&argument)
                    .into_iter()
                    .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry.path()));
                for entry in walker.filter_map(|e| e.ok()) {
                    let path = entry.path();
                    if entry.file_type().is_file() && self.is_selected(path) {
                        files.push(path.to_path_buf());
                    }
                }
            } else if !self.is_excluded(&argument) {
                // missing files are kept so they get reported as unreadable
                files.push(argument);
            }
        }

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn finder() -> FileFinder {
        FileFinder::new(&strings(&["*.py", "*.md"]), &strings(&[".git", "build", "*_pb2.py"]))
            .unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_walks_directories_with_filters() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a.py"));
        touch(&root.join("README.md"));
        touch(&root.join("notes.txt"));
        touch(&root.join("pkg/b.py"));
        touch(&root.join("pkg/msg_pb2.py"));
        touch(&root.join("build/c.py"));
        touch(&root.join(".git/hooks/d.py"));

        let files = finder().discover_files(&[], root);

        assert_eq!(
            files,
            vec![root.join("README.md"), root.join("a.py"), root.join("pkg/b.py")]
        );
    }

    #[test]
    fn test_explicit_file_is_kept_regardless_of_name() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("script"));
        touch(&root.join("gen_pb2.py"));

        let files = finder().discover_files(
            &[PathBuf::from("script"), PathBuf::from("gen_pb2.py")],
            root,
        );

        assert_eq!(files, vec![root.join("script")]);
    }

    #[test]
    fn test_missing_explicit_file_is_kept() {
        let dir = tempdir().unwrap();
        let files = finder().discover_files(&[PathBuf::from("missing.py")], dir.path());
        assert_eq!(files, vec![dir.path().join("missing.py")]);
    }

    #[test]
    fn test_results_are_deduplicated() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("pkg/b.py"));

        let files = finder().discover_files(
            &[PathBuf::from("pkg"), PathBuf::from("pkg/b.py")],
            root,
        );

        assert_eq!(files, vec![root.join("pkg/b.py")]);
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let err = FileFinder::new(&strings(&["[a"]), &[]).err().unwrap();
        assert!(err.is_config());
    }
}
