//! Budgeted selection and rendering of retrieved events

mod cost;
mod format;
mod retriever;

pub use cost::{estimate_cost, CHARS_PER_UNIT};
pub use format::{format_context, EXCERPT_LIMIT};
pub use retriever::Retriever;
