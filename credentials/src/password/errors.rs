use thiserror::Error;

/// Error type for password operations.
///
/// A password that does not match is not an error; see
/// [`PasswordHasher::verify`](super::PasswordHasher::verify).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Invalid password hashing parameters: {0}")]
    InvalidParams(String),
}
