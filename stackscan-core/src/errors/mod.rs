//! Error types and stable error codes.

pub mod error_code;
pub mod table_error;

pub use error_code::StackscanErrorCode;
pub use table_error::TableError;
