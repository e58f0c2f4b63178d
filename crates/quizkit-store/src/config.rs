//! Configuration and store factory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizkit_core::seed::sample_tests;
use quizkit_core::state::StateProvider;
use quizkit_core::traits::DataStore;

use crate::file::FileStore;
use crate::memory::MemoryStore;

/// Environment variable that replaces `data_dir`.
pub const DATA_DIR_ENV: &str = "QUIZKIT_DATA_DIR";

/// Which data store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Memory,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::File => write!(f, "file"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StoreKind::File),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(format!("unknown store: {s}")),
        }
    }
}

/// Top-level quizkit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizkitConfig {
    /// Directory holding `tests.json` and `testResults.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub store: StoreKind,
    /// Install the sample catalog when no tests are stored.
    #[serde(default = "default_seed_catalog")]
    pub seed_catalog: bool,
    /// Where rendered reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizkit-data")
}
fn default_seed_catalog() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizkit-reports")
}

impl Default for QuizkitConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store: StoreKind::default(),
            seed_catalog: default_seed_catalog(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    // Substituted values are not rescanned.
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
            from = start + value.len();
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizkit.toml` in the current directory
/// 2. `~/.config/quizkit/config.toml`
///
/// `QUIZKIT_DATA_DIR` overrides `data_dir` whichever file is used.
pub fn load_config() -> Result<QuizkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizkitConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizkit.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("reading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizkitConfig::default(),
    };

    Ok(apply_overrides(config, std::env::var(DATA_DIR_ENV).ok()))
}

/// Parse a config document and expand `${VAR}` references in its paths.
pub fn parse_config(content: &str) -> Result<QuizkitConfig> {
    let mut config: QuizkitConfig = toml::from_str(content)?;
    config.data_dir = resolve_path(&config.data_dir);
    config.output_dir = resolve_path(&config.output_dir);
    Ok(config)
}

fn apply_overrides(mut config: QuizkitConfig, data_dir: Option<String>) -> QuizkitConfig {
    if let Some(dir) = data_dir.filter(|d| !d.is_empty()) {
        config.data_dir = PathBuf::from(resolve_env_vars(&dir));
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizkit"))
}

/// Create the data store selected by `config`.
pub fn create_store(config: &QuizkitConfig) -> Box<dyn DataStore> {
    match config.store {
        StoreKind::File => Box::new(FileStore::new(&config.data_dir)),
        StoreKind::Memory => Box::new(MemoryStore::new()),
    }
}

/// Create the configured store and load a state provider from it.
pub fn open_provider(config: &QuizkitConfig) -> Result<StateProvider> {
    let store = create_store(config);
    tracing::debug!(store = store.name(), data_dir = %config.data_dir.display(), "opening data store");
    let seed = if config.seed_catalog {
        sample_tests()
    } else {
        Vec::new()
    };
    StateProvider::open(store, seed).context("failed to load quiz data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZKIT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZKIT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZKIT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_QUIZKIT_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_expands_self_reference_once() {
        std::env::set_var("_QUIZKIT_TEST_SELF", "${_QUIZKIT_TEST_SELF}");
        assert_eq!(
            resolve_env_vars("${_QUIZKIT_TEST_SELF}/data"),
            "${_QUIZKIT_TEST_SELF}/data"
        );
        std::env::remove_var("_QUIZKIT_TEST_SELF");
    }

    #[test]
    fn default_config() {
        let config = QuizkitConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./quizkit-data"));
        assert_eq!(config.store, StoreKind::File);
        assert!(config.seed_catalog);
    }

    #[test]
    fn parse_partial_config_fills_defaults() {
        let config = parse_config(
            r#"
store = "memory"
seed_catalog = false
"#,
        )
        .unwrap();
        assert_eq!(config.store, StoreKind::Memory);
        assert!(!config.seed_catalog);
        assert_eq!(config.output_dir, PathBuf::from("./quizkit-reports"));
    }

    #[test]
    fn parse_expands_paths() {
        std::env::set_var("_QUIZKIT_TEST_ROOT", "/srv/quiz");
        let config = parse_config(r#"data_dir = "${_QUIZKIT_TEST_ROOT}/data""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/quiz/data"));
        std::env::remove_var("_QUIZKIT_TEST_ROOT");
    }

    #[test]
    fn unknown_store_is_rejected() {
        assert!(parse_config(r#"store = "redis""#).is_err());
        assert_eq!("Memory".parse::<StoreKind>(), Ok(StoreKind::Memory));
        assert!("redis".parse::<StoreKind>().is_err());
    }

    #[test]
    fn data_dir_override_wins() {
        let config = apply_overrides(QuizkitConfig::default(), Some("/tmp/elsewhere".into()));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/elsewhere"));

        let untouched = apply_overrides(QuizkitConfig::default(), Some(String::new()));
        assert_eq!(untouched.data_dir, PathBuf::from("./quizkit-data"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizkit.toml");
        std::fs::write(&path, "output_dir = \"out\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn open_provider_with_memory_store_seeds_catalog() {
        let config = QuizkitConfig {
            store: StoreKind::Memory,
            ..Default::default()
        };
        let provider = open_provider(&config).unwrap();
        assert_eq!(provider.tests().len(), 3);

        let empty = open_provider(&QuizkitConfig {
            store: StoreKind::Memory,
            seed_catalog: false,
            ..Default::default()
        })
        .unwrap();
        assert!(empty.tests().is_empty());
    }

    #[test]
    fn open_provider_with_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuizkitConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let first: Vec<String> = open_provider(&config)
            .unwrap()
            .tests()
            .iter()
            .map(|t| t.id.clone())
            .collect();
        let second: Vec<String> = open_provider(&config)
            .unwrap()
            .tests()
            .iter()
            .map(|t| t.id.clone())
            .collect();
        assert_eq!(first, second);
        assert!(dir.path().join("tests.json").exists());
    }
}
