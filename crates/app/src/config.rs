use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use screening_core::model::{AnswerKey, OptionId, QuestionId};
use serde::Deserialize;
use services::HttpFetcherConfig;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path:?}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{message}")]
    Validation { message: String },
    #[error("invalid answer key: {0}")]
    AnswerKey(#[from] screening_core::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub answer_key: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_db_url")]
    pub db_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetcherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_db_url() -> String {
    "sqlite://screening.sqlite3".into()
}

fn default_base_url() -> String {
    HttpFetcherConfig::DEFAULT_BASE_URL.into()
}

fn default_timeout_secs() -> u64 {
    HttpFetcherConfig::DEFAULT_TIMEOUT.as_secs()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_url: default_db_url(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            fetcher: FetcherConfig::default(),
            answer_key: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Answer key built from the `[answer_key]` table.
    pub fn answer_key(&self) -> Result<AnswerKey> {
        let mut pairs = Vec::with_capacity(self.answer_key.len());
        let mut seen = HashSet::with_capacity(self.answer_key.len());
        for (question, option) in &self.answer_key {
            let question = QuestionId::parse(question).map_err(screening_core::Error::from)?;
            let option = OptionId::parse(option).map_err(screening_core::Error::from)?;
            if !seen.insert(question.clone()) {
                return Err(ConfigError::Validation {
                    message: format!(
                        "answer_key lists question {:?} more than once after trimming.",
                        question.as_str()
                    ),
                });
            }
            pairs.push((question, option));
        }
        Ok(pairs.into_iter().collect())
    }

    #[must_use]
    pub fn fetcher(&self) -> HttpFetcherConfig {
        HttpFetcherConfig::new(
            self.fetcher.base_url.clone(),
            Duration::from_secs(self.fetcher.timeout_secs),
        )
    }
}

/// Load the config file if given, apply environment overrides, and validate.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut cfg = match path {
        Some(path) => parse(path)?,
        None => Config::default(),
    };

    if let Some(url) = env_override("SCREENING_DB_URL") {
        cfg.storage.db_url = url;
    }
    if let Some(url) = env_override("SCREENING_FETCH_URL") {
        cfg.fetcher.base_url = url;
    }

    validate(&cfg)?;
    Ok(cfg)
}

fn parse(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_toml(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn from_toml(raw: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

fn env_override(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.storage.db_url.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "storage.db_url must be non-empty.".into(),
        });
    }
    if cfg.fetcher.base_url.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "fetcher.base_url must be non-empty.".into(),
        });
    }
    if cfg.fetcher.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "fetcher.timeout_secs must be greater than zero.".into(),
        });
    }
    cfg.answer_key()?;
    Ok(())
}
