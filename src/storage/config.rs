use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, TranscriptError};

pub const TARGET_ENV: &str = "DM_TRANSCRIPT_TARGET";
pub const SAVE_PATH_ENV: &str = "DM_TRANSCRIPT_SAVE_PATH";

/// Immutable settings fixed at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The only sender whose direct messages get logged.
    pub target_user_id: u64,
    /// Directory for messages.txt, messages.html, avatars and attachments.
    pub save_path: PathBuf,
    #[serde(default)]
    pub escape_html: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("dm-transcript/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    pub fn new(target_user_id: u64, save_path: impl Into<PathBuf>) -> Self {
        Config {
            target_user_id,
            save_path: save_path.into(),
            escape_html: false,
            user_agent: default_user_agent(),
        }
    }
}

pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Read config.toml, then let DM_TRANSCRIPT_TARGET / DM_TRANSCRIPT_SAVE_PATH
/// override the file.
pub fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(TranscriptError::MissingConfig(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    apply_env_overrides(
        &mut config,
        std::env::var(TARGET_ENV).ok(),
        std::env::var(SAVE_PATH_ENV).ok(),
    )?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut Config,
    target: Option<String>,
    save_path: Option<String>,
) -> Result<()> {
    if let Some(raw) = target.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        config.target_user_id = raw.parse().map_err(|_| TranscriptError::InvalidConfig {
            key: TARGET_ENV.to_string(),
            value: raw.clone(),
        })?;
    }
    if let Some(dir) = save_path.filter(|s| !s.trim().is_empty()) {
        config.save_path = PathBuf::from(dir);
    }
    Ok(())
}
