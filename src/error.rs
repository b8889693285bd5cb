use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("No config found at {0}. Run 'dm-transcript init'.")]
    MissingConfig(PathBuf),

    #[error("Invalid config value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    #[error("{0} event(s) could not be parsed")]
    RejectedEvents(usize),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TranscriptError>;
