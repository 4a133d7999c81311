//! Shared error type across awsx crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed input (YAML, arguments).
    BadRequest,
    /// Structurally invalid policy file or declaration.
    InvalidPolicy,
    /// Region resolution could not complete.
    ResolutionFailed,
    /// A registry key was registered twice.
    DuplicateRegistration,
    /// Configuration could not be loaded or failed validation.
    Config,
    /// The host engine could not be invoked.
    Engine,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and HTTP responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidPolicy => "INVALID_POLICY",
            ErrorCode::ResolutionFailed => "RESOLUTION_FAILED",
            ErrorCode::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Engine => "ENGINE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AwsxError>;

/// Unified error type used by core and provider.
#[derive(Debug, Error)]
pub enum AwsxError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("region resolution failed: {0}")]
    Resolution(String),
    #[error("duplicate registration: {registry} already has {key}")]
    DuplicateRegistration { registry: String, key: String },
    #[error("config: {0}")]
    Config(String),
    #[error("engine: {0}")]
    Engine(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AwsxError {
    /// Map the error to a stable caller-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AwsxError::BadRequest(_) => ErrorCode::BadRequest,
            AwsxError::InvalidPolicy(_) => ErrorCode::InvalidPolicy,
            AwsxError::Resolution(_) => ErrorCode::ResolutionFailed,
            AwsxError::DuplicateRegistration { .. } => ErrorCode::DuplicateRegistration,
            AwsxError::Config(_) => ErrorCode::Config,
            AwsxError::Engine(_) => ErrorCode::Engine,
            AwsxError::Internal(_) => ErrorCode::Internal,
        }
    }
}
