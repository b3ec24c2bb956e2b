use thiserror::Error;

/// Errors produced by catalog decoding and validation routines.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed map catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
