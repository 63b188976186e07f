use thiserror::Error;

use crate::cipher::CipherError;
use crate::jwt::BearerError;
use crate::jwt::JwtError;
use crate::password::PasswordError;

/// Flat classification of every failure the crate can report.
///
/// Lets callers pick a response (re-authenticate, reject, retry later)
/// without matching on each component's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SigningError,
    SignatureInvalid,
    AlgorithmMismatch,
    TokenExpired,
    MalformedClaims,
    EmptyCredential,
    MissingBearerPrefix,
    MalformedToken,
    AuthenticationFailed,
    MalformedPayload,
    /// Password hashing failed, or the OS random source was unavailable
    /// (also reported when sealing a payload cannot draw a nonce).
    HashingError,
}

/// Top-level error for all credential operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Token error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Bearer error: {0}")]
    Bearer(#[from] BearerError),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl CredentialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Jwt(e) => match e {
                JwtError::SigningError(_) => ErrorKind::SigningError,
                JwtError::SignatureInvalid => ErrorKind::SignatureInvalid,
                JwtError::AlgorithmMismatch(_) => ErrorKind::AlgorithmMismatch,
                JwtError::TokenExpired => ErrorKind::TokenExpired,
                JwtError::MalformedClaims(_) => ErrorKind::MalformedClaims,
                JwtError::MalformedToken(_) => ErrorKind::MalformedToken,
            },
            Self::Bearer(e) => match e {
                BearerError::EmptyCredential => ErrorKind::EmptyCredential,
                BearerError::MissingBearerPrefix => ErrorKind::MissingBearerPrefix,
                BearerError::MalformedToken => ErrorKind::MalformedToken,
            },
            Self::Cipher(e) => match e {
                CipherError::AuthenticationFailed => ErrorKind::AuthenticationFailed,
                // A key of the wrong size can never authenticate a payload.
                CipherError::InvalidKeyLength(_) => ErrorKind::AuthenticationFailed,
                CipherError::MalformedPayload(_) | CipherError::NotUtf8 => {
                    ErrorKind::MalformedPayload
                }
                // Same entropy-source fault that fails password hashing.
                CipherError::EntropyUnavailable(_) => ErrorKind::HashingError,
            },
            Self::Password(_) => ErrorKind::HashingError,
        }
    }

    /// Whether the caller should ask the principal to sign in again rather
    /// than reject the request outright.
    pub fn is_expired(&self) -> bool {
        self.kind() == ErrorKind::TokenExpired
    }
}
