//! Error types for hubplan domain values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown tier: {0} (expected staging or prod)")]
    UnknownTier(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
