//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving configuration.
///
/// Unlike parse and classification failures, these reflect caller intent
/// and are never replaced by a default.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown index backend '{0}' (expected file_index, session_chain or decision_set)")]
    UnknownBackend(String),

    #[error("malformed config at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access config: {0}")]
    Io(#[from] std::io::Error),
}
