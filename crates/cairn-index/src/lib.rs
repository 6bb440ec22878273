//! Pluggable event indexes answering relevance queries

mod backend;
mod decision_set;
mod error;
mod file_index;
mod index;
mod ledger;
mod session_chain;

pub use backend::{query_tokens, Backend, MIN_RESULTS};
pub use decision_set::DecisionSet;
pub use error::IndexError;
pub use file_index::{FileIndex, UNATTRIBUTED};
pub use index::EventIndex;
pub use session_chain::SessionChain;
