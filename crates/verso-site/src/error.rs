//! Error types for site resolution.

use std::path::PathBuf;

/// Fatal misconfiguration detected while preparing the site context.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    MissingSourceDir(PathBuf),
    /// Filesystem failure while preparing or listing the archive directory.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigurationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
