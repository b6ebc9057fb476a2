use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading the replacement dataset.
pub enum CatalogError {
    /// Dataset file could not be read.
    #[error("failed to read dataset '{path}': {source}")]
    Io {
        /// Dataset path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Dataset file is not valid JSON (or records have the wrong shape).
    #[error("failed to parse dataset '{path}': {source}")]
    Parse {
        /// Dataset path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Dataset parsed but contained no usable records.
    #[error("dataset '{path}' contains no replacement records")]
    Empty {
        /// Dataset path.
        path: PathBuf,
    },
}
