pub mod config;
pub mod content_types;
pub mod import_status;
pub mod storage;

pub use import_status::ImportStatus;
