use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::claims::Identity;
use super::errors::JwtError;

/// The only algorithm tokens are signed with (HMAC over SHA-256).
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues signed tokens for a fixed issuer and lifetime.
///
/// Holds no key material: the secret is supplied on every call so it can be
/// rotated or differ per tenant.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    issuer: String,
    expiration: Option<Duration>,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `issuer` - Identifier of the issuing authority
    /// * `expiration` - Token lifetime; zero or negative issues tokens that never expire
    pub fn new(issuer: impl ToString, expiration: Duration) -> Self {
        Self {
            issuer: issuer.to_string(),
            expiration: (expiration > Duration::zero()).then_some(expiration),
        }
    }

    /// Create a token issuer with a lifetime in hours (`0` means no expiry).
    pub fn with_expiration_hours(issuer: impl ToString, expiration_hours: i64) -> Self {
        Self::new(issuer, Duration::hours(expiration_hours))
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn expiration(&self) -> Option<Duration> {
        self.expiration
    }

    /// Build the claims a token issued at `now` would carry.
    pub fn build_claims(&self, identity: Identity, now: DateTime<Utc>) -> Claims {
        let expires_at = self.expiration.map(|lifetime| now + lifetime);
        Claims::for_identity(identity, &self.issuer, now, expires_at)
    }

    /// Issue a token for an identity, stamped with the current time.
    ///
    /// # Errors
    /// * `SigningError` - Secret is empty or claims could not be encoded
    pub fn issue(&self, secret: &[u8], identity: Identity) -> Result<String, JwtError> {
        self.issue_at(secret, identity, Utc::now())
    }

    /// Issue a token for an identity as if the current time were `now`.
    pub fn issue_at(
        &self,
        secret: &[u8],
        identity: Identity,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = self.build_claims(identity, now);
        self.sign(secret, &claims)
    }

    /// Sign already built claims.
    ///
    /// Use together with [`TokenIssuer::build_claims`] and
    /// [`Claims::try_with_extension`] to carry custom fields.
    ///
    /// # Errors
    /// * `SigningError` - Secret is empty, an extension shadows a typed claim,
    ///   or claims could not be encoded
    pub fn sign(&self, secret: &[u8], claims: &Claims) -> Result<String, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::SigningError("secret must not be empty".to_string()));
        }

        if let Some(key) = claims.reserved_extension() {
            return Err(JwtError::SigningError(format!(
                "extension key `{}` is a reserved claim",
                key
            )));
        }

        let header = Header::new(SIGNING_ALGORITHM);
        let token = encode(&header, claims, &EncodingKey::from_secret(secret))
            .map_err(|e| JwtError::SigningError(e.to_string()))?;

        tracing::debug!(
            subject = %claims.sub,
            issuer = %claims.iss,
            expires_at = ?claims.exp,
            "Token issued"
        );

        Ok(token)
    }
}
