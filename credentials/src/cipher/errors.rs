use thiserror::Error;

/// Error type for symmetric encryption operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("Payload failed authentication")]
    AuthenticationFailed,

    #[error("Sealed payload is malformed: {0}")]
    MalformedPayload(String),

    #[error("Secret must be 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Plaintext is not valid UTF-8")]
    NotUtf8,
}
