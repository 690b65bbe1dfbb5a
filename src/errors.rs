use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {file}: {source}")]
    Json { file: PathBuf, source: serde_json::Error },
    #[error("Invalid TOML in {file}: {source}")]
    Toml { file: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Cannot traverse {path}: {source}")]
    Traversal { path: PathBuf, source: walkdir::Error },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
