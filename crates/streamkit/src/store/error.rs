use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading or saving a settings document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The document does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// An earlier load of this path failed, so saving to it is refused.
    #[error("save attempts are blocked on {}", .path.display())]
    SavingBlocked { path: PathBuf },

    /// The path does not reside in a directory.
    #[error("path does not reside in a directory: {}", .path.display())]
    InvalidPath { path: PathBuf },

    /// Filesystem failure on a specific path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failure reading from or writing to the serializer's stream.
    #[error("stream error: {0}")]
    Stream(#[from] io::Error),

    /// The document is not valid JSON for the requested type.
    #[error("json (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid TOML for the requested type.
    #[cfg_attr(docsrs, doc(cfg(feature = "toml")))]
    #[cfg(feature = "toml")]
    #[error("toml deserialization failed: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// The value cannot be represented as TOML.
    #[cfg_attr(docsrs, doc(cfg(feature = "toml")))]
    #[cfg(feature = "toml")]
    #[error("toml serialization failed: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
