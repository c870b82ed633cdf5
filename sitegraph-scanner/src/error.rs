use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
