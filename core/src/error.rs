//! Errors raised while loading and indexing source records.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but does not match the post schema.
    #[error("malformed post {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Error::Format { path: path.into(), source }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Io { path, .. } | Error::Format { path, .. } => path,
        }
    }
}
