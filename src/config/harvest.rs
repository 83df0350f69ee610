// src/config/harvest.rs
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_HARVEST_CONFIG_PATH: &str = "HARVEST_CONFIG_PATH";
pub const DEFAULT_HARVEST_CONFIG_PATH: &str = "config/harvest.toml";

fn default_out_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_sleep_secs() -> f64 {
    0.5
}
fn default_language() -> String {
    "hun".to_string()
}
fn default_users() -> Vec<String> {
    vec!["Levin".to_string()]
}

/// Locations of the flat-file stores.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatePaths {
    pub processed: PathBuf,
    pub failed: PathBuf,
    pub excluded_categories: PathBuf,
    pub discovered_categories: PathBuf,
}

impl Default for StatePaths {
    fn default() -> Self {
        Self {
            processed: PathBuf::from("visited_users.txt"),
            failed: PathBuf::from("timeouts_users.txt"),
            excluded_categories: PathBuf::from("visited_subs.txt"),
            discovered_categories: PathBuf::from("new_subs.txt"),
        }
    }
}

/// Settings read from `config/harvest.toml` (every key optional).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HarvestFileConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_users")]
    pub default_users: Vec<String>,
    #[serde(default = "default_sleep_secs")]
    pub sleep_secs: f64,
    /// Target language for the filter (ISO 639-3 or 639-1).
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub hunspell_aff: Option<PathBuf>,
    #[serde(default)]
    pub hunspell_dic: Option<PathBuf>,
    /// Plain word list used instead of hunspell when set.
    #[serde(default)]
    pub wordlist: Option<PathBuf>,
    #[serde(default)]
    pub state: StatePaths,
}

impl Default for HarvestFileConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            default_users: default_users(),
            sleep_secs: default_sleep_secs(),
            language: default_language(),
            hunspell_aff: None,
            hunspell_dic: None,
            wordlist: None,
            state: StatePaths::default(),
        }
    }
}

impl HarvestFileConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parsing harvest config")?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading harvest config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("in harvest config {}", path.display()))
    }

    /// Resolve the config file:
    /// 1) explicit path (CLI `--config`), must exist
    /// 2) $HARVEST_CONFIG_PATH, must exist
    /// 3) config/harvest.toml if present
    /// 4) built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            if !p.exists() {
                return Err(ConfigError::MissingConfigFile(p.to_path_buf()).into());
            }
            return Self::load_from(p);
        }
        if let Ok(p) = std::env::var(ENV_HARVEST_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(ConfigError::MissingConfigFile(pb).into());
            }
            return Self::load_from(&pb);
        }
        let fallback = PathBuf::from(DEFAULT_HARVEST_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let cfg = HarvestFileConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, HarvestFileConfig::default());
        assert_eq!(cfg.state.processed, PathBuf::from("visited_users.txt"));
    }

    #[test]
    fn partial_state_table_keeps_other_defaults() {
        let cfg = HarvestFileConfig::from_toml_str(
            r#"
out_dir = "dump"
sleep_secs = 0.1
language = "hu"

[state]
processed = "state/done.txt"
"#,
        )
        .unwrap();
        assert_eq!(cfg.out_dir, PathBuf::from("dump"));
        assert_eq!(cfg.language, "hu");
        assert_eq!(cfg.state.processed, PathBuf::from("state/done.txt"));
        assert_eq!(cfg.state.failed, PathBuf::from("timeouts_users.txt"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = HarvestFileConfig::load(Some(Path::new("/definitely/not/here.toml")))
            .unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn shipped_example_matches_defaults() {
        let cfg =
            HarvestFileConfig::from_toml_str(include_str!("../../config/harvest.example.toml"))
                .unwrap();
        assert_eq!(cfg, HarvestFileConfig::default());
    }
}
