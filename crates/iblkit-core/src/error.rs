use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid manifest: {0}")]
    Format(String),

    #[error("Missing asset: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Persisted state error: {0}")]
    Persist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
