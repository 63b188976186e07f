use chrono::DateTime;
use chrono::Utc;

use crate::config::CredentialsConfig;
use crate::errors::CredentialError;
use crate::jwt::extract_bearer;
use crate::jwt::Claims;
use crate::jwt::Identity;
use crate::jwt::JwtError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenValidator;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// Owns one signing secret; services that rotate keys or serve several
/// tenants keep one instance per secret, or call the components directly.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
    jwt_secret: Vec<u8>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
    /// When the token stops being accepted, `None` if it never expires
    pub expires_at: Option<DateTime<Utc>>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_issuer", &self.token_issuer)
            .field("jwt_secret", &"[hidden]")
            .finish()
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `token_issuer` - Issuer name and token lifetime
    pub fn new(jwt_secret: &[u8], token_issuer: TokenIssuer) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer,
            token_validator: TokenValidator::new(),
            jwt_secret: jwt_secret.to_vec(),
        }
    }

    /// Build an authenticator from loaded configuration.
    ///
    /// # Errors
    /// * `InvalidParams` - Configured password costs are rejected by Argon2
    pub fn from_config(config: &CredentialsConfig) -> Result<Self, PasswordError> {
        Ok(Self {
            password_hasher: PasswordHasher::with_params(config.password)?,
            token_issuer: TokenIssuer::with_expiration_hours(
                &config.jwt.issuer,
                config.jwt.expiration_hours,
            ),
            token_validator: TokenValidator::new(),
            jwt_secret: config.jwt.secret.as_bytes().to_vec(),
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Principal the token is issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `JwtError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: Identity,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let claims = self.token_issuer.build_claims(identity, Utc::now());
        let access_token = self.token_issuer.sign(&self.jwt_secret, &claims)?;

        Ok(AuthenticationResult {
            access_token,
            expires_at: claims.expires_at(),
        })
    }

    /// Issue a token without password verification.
    ///
    /// Useful for renewal flows or when authentication has already been
    /// verified by other means.
    pub fn generate_token(&self, identity: Identity) -> Result<String, JwtError> {
        self.token_issuer.issue(&self.jwt_secret, identity)
    }

    /// Validate a bare token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_validator.validate(token, &self.jwt_secret)
    }

    /// Authorize a request from its authorization header value.
    ///
    /// # Errors
    /// * `Bearer` - Header value is empty, lacks the bearer scheme, or the token is misshapen
    /// * `Jwt` - Token fails validation
    pub fn authorize(&self, header_value: &str) -> Result<Claims, CredentialError> {
        let token = extract_bearer(header_value)?;
        Ok(self.validate_token(token)?)
    }
}
