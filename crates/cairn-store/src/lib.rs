//! Durable storage for the event log and derived index state

mod io;
mod log;
mod paths;

pub use io::{append_jsonl, atomic_write, read_jsonl};
pub use log::EventLog;
pub use paths::Paths;
