pub mod hooks;
pub mod ingest;
pub mod init;
pub mod query;
pub mod rebuild;
pub mod status;
pub mod version;
