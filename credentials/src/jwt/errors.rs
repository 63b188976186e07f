use thiserror::Error;

/// Error type for token operations.
///
/// Expired, tampered and malformed tokens are distinct variants so callers
/// can choose a different response for each.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningError(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token algorithm is not accepted: {0}")]
    AlgorithmMismatch(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token claims are malformed: {0}")]
    MalformedClaims(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),
}

/// Error type for extracting a token from an authorization header value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Credential is required")]
    EmptyCredential,

    #[error("Bearer prefix is required")]
    MissingBearerPrefix,

    #[error("Bearer token is malformed")]
    MalformedToken,
}
