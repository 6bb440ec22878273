//! Index state errors

use cairn_core::BackendKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("malformed index state: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("inconsistent index state: {0}")]
    Inconsistent(String),

    #[error("index state was built by {found}, expected {expected}")]
    BackendMismatch {
        expected: BackendKind,
        found: BackendKind,
    },
}
