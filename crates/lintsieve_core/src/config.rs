//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::LinterError;
use crate::exceptions::ExceptionsConfig;
use crate::rule_set::PluginsConfig;

/// Keys whose maps are unioned instead of replaced when configs are merged.
const MERGED_SECTIONS: &[&str] = &["plugins", "exceptions"];

/// Keys holding paths relative to the file they are written in.
const PATH_KEYS: &[&str] = &["baseline", "cache_dir"];

/// Configuration for the linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    /// Plugin name pattern to rules.
    pub plugins: PluginsConfig,

    /// Path pattern to a nested `plugins` map.
    pub exceptions: ExceptionsConfig,

    /// File of digests of findings to hide.
    pub baseline: Option<PathBuf>,

    /// Report failing checks as findings instead of aborting the run.
    pub safe: bool,

    /// Whether to enable caching.
    pub cache: bool,

    /// Cache directory. Defaults to the user cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Age in seconds after which unused cache entries are removed.
    pub cache_ttl: u64,

    /// Globs selecting files when walking directories.
    pub filename: Vec<String>,

    /// Globs of files and directories to skip.
    pub exclude: Vec<String>,

    /// Ignore `# noqa` comments.
    pub disable_noqa: bool,

    /// Config files this one extends.
    pub base: Vec<PathBuf>,

    /// Directory relative paths are resolved against.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            plugins: BTreeMap::from([
                ("pyflakes".to_string(), strings(&["+*"])),
                ("pycodestyle".to_string(), strings(&["+*"])),
            ]),
            exceptions: BTreeMap::new(),
            baseline: None,
            safe: false,
            cache: true,
            cache_dir: None,
            cache_ttl: lintsieve_cache::DEFAULT_TTL.as_secs(),
            filename: strings(&[
                "*.py", "*.ipynb", "*.md", "*.yml", "*.yaml", "*.rst", "*.rest",
            ]),
            exclude: strings(&[
                ".git",
                "__pycache__",
                ".tox",
                ".venv",
                "venv",
                "build",
                "dist",
                "*.egg-info",
            ]),
            disable_noqa: false,
            base: Vec::new(),
            base_dir: None,
        }
    }
}

impl LinterConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, following `base` files first.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let value = load_merged(path, &mut Vec::new())?;

        let mut config: Self = serde_json::from_value(Value::Object(value))
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))?;

        config.base_dir = Some(config_dir(path)?);

        Ok(config)
    }

    /// Parses configuration from a JSON string. `base` is not followed.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = parse_object(json)?;
        serde_json::from_value(Value::Object(value))
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Resolves `path` against [`Self::base_dir`].
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// The baseline file to load, if one is configured.
    pub fn baseline_path(&self) -> Option<PathBuf> {
        self.baseline
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| self.resolve_path(path))
    }

    /// The directory cache entries are written to.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => self.resolve_path(dir),
            None => dirs::cache_dir()
                .map(|dir| dir.join("lintsieve"))
                .unwrap_or_else(|| PathBuf::from(".lintsieve-cache")),
        }
    }
}

fn parse_object(json: &str) -> Result<Map<String, Value>, LinterError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?;
    let Value::Object(mut object) = value else {
        return Err(LinterError::config("Config must be a JSON object"));
    };

    // `base` may be a single path.
    if let Some(base) = object.get_mut("base")
        && base.is_string()
    {
        *base = Value::Array(vec![base.take()]);
    }

    Ok(object)
}

/// The absolute directory holding the config file at `path`.
fn config_dir(path: &Path) -> Result<PathBuf, LinterError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::path::absolute(parent).map_err(|e| {
        LinterError::config(format!("Cannot resolve {}: {}", path.display(), e))
    })
}

/// Reads `path` and everything it extends into one JSON object.
fn load_merged(path: &Path, stack: &mut Vec<PathBuf>) -> Result<Map<String, Value>, LinterError> {
    let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&identity) {
        return Err(LinterError::config(format!(
            "Config inheritance cycle at {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        LinterError::config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    let mut current = parse_object(&content)?;
    let dir = config_dir(path)?;
    resolve_relative_paths(&mut current, &dir);

    let bases: Vec<PathBuf> = current
        .get("base")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default();
    if bases.is_empty() {
        return Ok(current);
    }

    stack.push(identity);
    let mut merged = Map::new();
    for base in &bases {
        debug!("Loading base config {}", base.display());
        let inherited = load_merged(base, stack)?;
        merge_into(&mut merged, inherited);
    }
    stack.pop();

    merge_into(&mut merged, current);
    Ok(merged)
}

fn resolve_relative_paths(object: &mut Map<String, Value>, dir: &Path) {
    let resolve = |value: &mut Value| {
        if let Some(raw) = value.as_str()
            && !raw.is_empty()
            && Path::new(raw).is_relative()
        {
            *value = Value::String(dir.join(raw).to_string_lossy().into_owned());
        }
    };

    for key in PATH_KEYS {
        if let Some(value) = object.get_mut(*key) {
            resolve(value);
        }
    }
    if let Some(Value::Array(items)) = object.get_mut("base") {
        items.iter_mut().for_each(resolve);
    }
}

/// Merges `overlay` on top of `target`. Later keys win; the maps in
/// [`MERGED_SECTIONS`] are unioned key by key.
fn merge_into(target: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        if MERGED_SECTIONS.contains(&key.as_str())
            && let Value::Object(entries) = value
        {
            match target.entry(key).or_insert_with(|| Value::Object(Map::new())) {
                Value::Object(existing) => existing.extend(entries),
                other => *other = Value::Object(entries),
            }
            continue;
        }
        target.insert(key, value);
    }
}
