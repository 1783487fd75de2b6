use anyhow::Context;
use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchFileConfig {
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub default_term: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub default_term: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_millis(15_000),
            proxy: None,
            default_term: stories_core::controller::DEFAULT_TERM.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let file = match Self::config_path() {
            Some(path) if path.exists() => Some(Self::read_file(&path)?),
            _ => None,
        };
        Ok(Self::resolve(file, |k| env::var(k).ok()))
    }

    /// Layers defaults, then the config file, then environment overrides.
    pub fn resolve(file: Option<SearchFileConfig>, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(f) = file {
            if let Some(e) = f.endpoint {
                cfg.endpoint = e;
            }
            if let Some(t) = f.timeout_ms {
                cfg.timeout = Duration::from_millis(t);
            }
            if let Some(d) = f.default_term.filter(|d| !d.trim().is_empty()) {
                cfg.default_term = d;
            }
        }
        if let Some(e) = var("HACKER_STORIES_ENDPOINT") {
            cfg.endpoint = e;
        }
        if let Some(t) = var("HACKER_STORIES_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
            cfg.timeout = Duration::from_millis(t);
        }
        cfg.proxy = var("HTTPS_PROXY").or_else(|| var("HTTP_PROXY"));
        cfg
    }

    fn read_file(path: &Path) -> anyhow::Result<SearchFileConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config file: {}", path.display()))
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".hacker-stories").join("config.toml")
        } else {
            base.config_dir().join("hacker-stories").join("config.toml")
        };
        Some(p)
    }
}
