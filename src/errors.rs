use thiserror::Error;

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Value verification failed: {0}")]
    VerificationFailed(String),

    #[error("Bounding box not found: {0}")]
    NotFound(String),

    #[error("Platform-specific error: {0}")]
    PlatformError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
