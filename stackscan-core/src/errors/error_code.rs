//! Stable machine-readable error codes.

/// Gives every error variant a stable code string for downstream consumers.
pub trait StackscanErrorCode {
    fn error_code(&self) -> &'static str;
}
