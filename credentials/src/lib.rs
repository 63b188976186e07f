//! Credential and token utilities
//!
//! The trust boundary shared by application services:
//! - Signed, expiring claims tokens (HS256 JWT)
//! - Bearer header extraction
//! - Authenticated symmetric encryption of opaque payloads (AES-GCM)
//! - Password hashing (Argon2id)
//!
//! Every component is stateless; secrets are passed explicitly on each call,
//! so rotation and multi-tenant use need no global state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use credentials::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use credentials::{extract_bearer, Identity, TokenIssuer, TokenValidator};
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let issuer = TokenIssuer::with_expiration_hours("my-service", 24);
//! let token = issuer.issue(secret, Identity::Username("alice".to_string())).unwrap();
//!
//! let header = format!("Bearer {}", token);
//! let claims = TokenValidator::new()
//!     .validate(extract_bearer(&header).unwrap(), secret)
//!     .unwrap();
//! assert_eq!(claims.username(), Some("alice"));
//! ```
//!
//! ## Payload Encryption
//! ```
//! use credentials::SymmetricCipher;
//!
//! let key = b"0123456789abcdef0123456789abcdef";
//! let cipher = SymmetricCipher::new();
//! let sealed = cipher.seal(key, b"opaque").unwrap();
//! assert_eq!(cipher.open(key, &sealed).unwrap(), b"opaque");
//! ```

pub mod authenticator;
pub mod cipher;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use cipher::CipherError;
pub use cipher::SymmetricCipher;
pub use config::CredentialsConfig;
pub use errors::CredentialError;
pub use errors::ErrorKind;
pub use jwt::extract_bearer;
pub use jwt::BearerError;
pub use jwt::Claims;
pub use jwt::Identity;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordParams;
