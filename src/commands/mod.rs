pub mod history;
pub mod ingest;
pub mod init;
pub mod render;
