use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile \"{0}\" is not defined in config.toml")]
    UnknownProfile(String),
    #[error("base URL \"{0}\" is not an absolute http(s) URL")]
    InvalidBaseUrl(String),
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub clipboard_ttl: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub reveal_in_cards: Option<bool>,

    // Profile management
    pub default_profile: Option<String>,
    pub profiles: Option<BTreeMap<String, FileProfileConfig>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileProfileConfig {
    pub base_url: String,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub clipboard_ttl: Option<u64>,
    pub request_timeout: Option<Duration>,
    pub reveal_in_cards: bool,
    pub log_file: Option<PathBuf>,
    pub default_profile: Option<String>,
    pub profiles: BTreeMap<String, String>,
}

impl Config {
    pub fn create(base_url: Option<String>, profile: Option<String>) -> Result<Self, ConfigError> {
        let file_cfg = load_file_config();

        // Base URL: flag > profile > env > default profile > file > built-in
        let base_url = resolve_base_url(base_url, profile.as_deref(), &file_cfg)?;
        validate_base_url(&base_url)?;

        // Scalars: env > file > None (callers apply their defaults)
        let clipboard_ttl = env_parse::<u64>("PASSCARD_CLIP_TTL").or(file_cfg.clipboard_ttl);
        let request_timeout = env_parse::<u64>("PASSCARD_TIMEOUT")
            .or(file_cfg.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let reveal_in_cards = file_cfg.reveal_in_cards.unwrap_or(true);
        let log_file = env::var("PASSCARD_LOG_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let profiles = file_cfg
            .profiles
            .unwrap_or_default()
            .into_iter()
            .map(|(name, p)| (name, p.base_url))
            .collect();

        Ok(Config {
            base_url,
            clipboard_ttl,
            request_timeout,
            reveal_in_cards,
            log_file,
            default_profile: file_cfg.default_profile,
            profiles,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn resolve_base_url(
    cli_url: Option<String>,
    cli_profile: Option<&str>,
    file_cfg: &FileConfig,
) -> Result<String, ConfigError> {
    if let Some(u) = cli_url {
        return Ok(u);
    }

    if let Some(name) = cli_profile {
        return file_cfg
            .profiles
            .as_ref()
            .and_then(|profiles| profiles.get(name))
            .map(|p| p.base_url.clone())
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()));
    }

    if let Ok(u) = env::var("PASSCARD_BASE_URL") {
        if !u.trim().is_empty() {
            return Ok(u);
        }
    }

    if let Some(default_name) = file_cfg.default_profile.as_deref() {
        if let Some(prof) = file_cfg
            .profiles
            .as_ref()
            .and_then(|profiles| profiles.get(default_name))
        {
            return Ok(prof.base_url.clone());
        }
        warn!(profile = default_name, "default profile is not defined; ignoring");
    }

    if let Some(u) = file_cfg.base_url.as_ref() {
        return Ok(u.clone());
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

pub fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    match url::Url::parse(raw.trim()) {
        Ok(u) if u.has_host() && matches!(u.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
}

fn load_file_config() -> FileConfig {
    let (_, cfg) = load_file_config_with_path();
    cfg
}

pub fn config_file_path() -> PathBuf {
    // PASSCARD_CONFIG_DIR isolates tests and alternate setups from the platform dir
    let cfg_dir = if let Ok(p) = env::var("PASSCARD_CONFIG_DIR") {
        PathBuf::from(p)
    } else {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
    };
    cfg_dir.join("passcard").join("config.toml")
}

pub fn load_file_config_with_path() -> (PathBuf, FileConfig) {
    let path = config_file_path();
    let cfg = match std::fs::read_to_string(&path) {
        Ok(s) => toml::from_str::<FileConfig>(&s).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            FileConfig::default()
        }),
        Err(_) => FileConfig::default(),
    };
    (path, cfg)
}

pub fn save_file_config(path: &Path, cfg: &FileConfig) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let s = toml::to_string_pretty(cfg).map_err(std::io::Error::other)?;
    std::fs::write(path, s)
}
