//! Image import operations: the operation registry and the content ingestor.

mod error;
pub mod ingest;
pub mod registry;

pub use error::ImportError;
pub use ingest::{ContentIngestor, IMPORT_BUCKET, IngestedContent, ValidatedUpload, content_key};
pub use registry::OperationRegistry;
