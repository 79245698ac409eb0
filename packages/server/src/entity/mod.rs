pub mod import_content;
pub mod import_operation;
