use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the route planner library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Search outcomes such as an unreachable goal are not errors; see
/// [`crate::common::SearchOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    /// An input file could not be opened or read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON report could not be written.
    #[error("failed to write report to {path}")]
    Report {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
