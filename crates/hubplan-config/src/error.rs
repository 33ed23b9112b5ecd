//! Configuration loading errors. All of them are fatal for a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("missing {kind} descriptor: {}", path.display())]
    MissingDescriptor { kind: &'static str, path: PathBuf },

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Attach the file the error came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ConfigError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<hubplan_core::Error> for ConfigError {
    fn from(err: hubplan_core::Error) -> Self {
        let field = match &err {
            hubplan_core::Error::UnknownTier(_) => "tier",
            hubplan_core::Error::InvalidInput(_) => "value",
        };
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
