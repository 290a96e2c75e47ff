use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersegrepError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Index file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid search type: {0}")]
    InvalidSearchType(String),

    #[error("Invalid verse reference: {0}")]
    InvalidReference(String),

    #[error("Malformed combined search expression: {0}")]
    CombinedParse(String),

    #[error("No index found for module '{module}' at {path}. Run 'versegrep index' first.")]
    NoIndex { module: String, path: PathBuf },

    #[error("Module '{0}' is not available")]
    UnknownModule(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VersegrepError>;
