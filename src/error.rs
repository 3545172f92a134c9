use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the radar catalog.
///
/// Loading is a one-shot startup operation; callers that want the
/// "empty but functioning" degradation log the error and fall back to
/// an empty store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read radar catalog from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse radar catalog")]
    Parse(#[from] serde_json::Error),
}
