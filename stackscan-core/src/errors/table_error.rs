//! Rule table loading errors.

use super::error_code::StackscanErrorCode;

/// Errors raised while loading the embedded rule tables.
///
/// These are the only hard failures in the workspace: a table that does not
/// parse is a build defect, not an input problem. Malformed or sparse
/// analysis input never errors — it degrades to lower confidence.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to parse rule table '{table}': {message}")]
    Parse { table: &'static str, message: String },

    #[error("Invalid suffix pattern '{pattern}' in category table: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl StackscanErrorCode for TableError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "TABLE_PARSE_FAILED",
            Self::InvalidPattern { .. } => "TABLE_INVALID_PATTERN",
        }
    }
}
