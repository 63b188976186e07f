use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::issuer::SIGNING_ALGORITHM;

/// Verifies tokens produced by [`TokenIssuer`](super::TokenIssuer).
///
/// Stateless; the expected secret is passed on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenValidator;

impl TokenValidator {
    pub fn new() -> Self {
        Self
    }

    /// Verify a token against the current time.
    ///
    /// # Arguments
    /// * `token` - Encoded token (`header.payload.signature`)
    /// * `secret` - Secret the token is expected to be signed with
    ///
    /// # Returns
    /// Claims embedded in the token
    ///
    /// # Errors
    /// * `MalformedToken` - Token structure or header cannot be parsed
    /// * `AlgorithmMismatch` - Header declares anything other than HS256
    /// * `SignatureInvalid` - Signature does not match the secret
    /// * `MalformedClaims` - Payload lacks required identity or timing fields
    /// * `TokenExpired` - Expiry instant has passed
    pub fn validate(&self, token: &str, secret: &[u8]) -> Result<Claims, JwtError> {
        self.validate_at(token, secret, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn validate_at(
        &self,
        token: &str,
        secret: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Claims, JwtError> {
        let result = verify(token, secret, now);

        match &result {
            Ok(claims) => tracing::debug!(subject = %claims.sub, "Token validated"),
            Err(e) => tracing::warn!(error = %e, "Token rejected"),
        }

        result
    }

    /// Decode claims without verifying signature or expiry.
    ///
    /// # Security Warning
    /// Only for diagnostics. Never base an authorization decision on the
    /// returned claims.
    pub fn inspect_unverified(&self, token: &str) -> Result<Claims, JwtError> {
        ensure_pinned_algorithm(token)?;

        let mut validation = relaxed_validation();
        validation.insecure_disable_signature_validation();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

fn verify(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<Claims, JwtError> {
    ensure_pinned_algorithm(token)?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &relaxed_validation(),
    )
    .map_err(map_decode_error)?
    .claims;

    if !claims.has_consistent_timing() {
        return Err(JwtError::MalformedClaims(
            "issued after its expiration".to_string(),
        ));
    }

    if claims.is_expired(now.timestamp()) {
        return Err(JwtError::TokenExpired);
    }

    Ok(claims)
}

/// Signature and algorithm only; timing is checked against the caller's clock.
fn relaxed_validation() -> Validation {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Reject any header whose algorithm is not HS256, including `none`.
///
/// Runs before the header is handed to `jsonwebtoken`, which cannot parse
/// unknown algorithm names and would report them as generic JSON errors.
fn ensure_pinned_algorithm(token: &str) -> Result<(), JwtError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(JwtError::MalformedToken(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    }

    let header = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|e| JwtError::MalformedToken(format!("header is not base64url: {}", e)))?;
    let header: serde_json::Value = serde_json::from_slice(&header)
        .map_err(|e| JwtError::MalformedToken(format!("header is not JSON: {}", e)))?;

    let algorithm = header
        .get("alg")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| JwtError::MalformedToken("header has no algorithm".to_string()))?;

    if algorithm != "HS256" {
        return Err(JwtError::AlgorithmMismatch(algorithm.to_string()));
    }

    decode_header(token)
        .map(|_| ())
        .map_err(|e| JwtError::MalformedToken(e.to_string()))
}

fn map_decode_error(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            JwtError::AlgorithmMismatch(error.to_string())
        }
        ErrorKind::Json(_) | ErrorKind::Utf8(_) => JwtError::MalformedClaims(error.to_string()),
        _ => JwtError::MalformedToken(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::claims::Identity;
    use crate::jwt::issuer::TokenIssuer;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn user() -> Identity {
        Identity::User {
            id: "user123".to_string(),
            username: "alice".to_string(),
        }
    }

    fn forge(header: &serde_json::Value, payload: &serde_json::Value, signature: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(payload.to_string()),
            signature
        )
    }

    #[test]
    fn test_round_trip_without_expiry() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 0);
        let now = Utc::now();
        let expected = issuer.build_claims(user(), now);

        let token = issuer.sign(SECRET, &expected).expect("Failed to sign token");
        let decoded = TokenValidator::new()
            .validate(&token, SECRET)
            .expect("Failed to validate token");

        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_validate_immediately_after_issuance() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 1);
        let token = issuer.issue(SECRET, user()).expect("Failed to issue token");

        let claims = TokenValidator::new()
            .validate(&token, SECRET)
            .expect("Failed to validate token");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username(), Some("alice"));
    }

    #[test]
    fn test_expired_after_clock_advance() {
        let issuer = TokenIssuer::new("cubetiq", Duration::minutes(30));
        let now = Utc::now();
        let token = issuer
            .issue_at(SECRET, user(), now)
            .expect("Failed to issue token");
        let validator = TokenValidator::new();

        assert!(validator
            .validate_at(&token, SECRET, now + Duration::minutes(30))
            .is_ok());

        let result = validator.validate_at(&token, SECRET, now + Duration::minutes(31));
        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_never_expiring_token_survives_clock_advance() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 0);
        let now = Utc::now();
        let token = issuer.issue_at(SECRET, user(), now).unwrap();

        let result =
            TokenValidator::new().validate_at(&token, SECRET, now + Duration::days(3650));
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 1);
        let token = issuer
            .issue(b"secret1_at_least_32_bytes_long_key!", user())
            .unwrap();

        let result = TokenValidator::new().validate(&token, b"secret2_at_least_32_bytes_long_key!");
        assert_eq!(result, Err(JwtError::SignatureInvalid));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 1);
        let token = issuer.issue(SECRET, user()).unwrap();
        let segments: Vec<&str> = token.split('.').collect();

        let mut payload: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
        payload["sub"] = serde_json::json!("admin");
        let tampered = format!(
            "{}.{}.{}",
            segments[0],
            URL_SAFE_NO_PAD.encode(payload.to_string()),
            segments[2]
        );

        let result = TokenValidator::new().validate(&tampered, SECRET);
        assert_eq!(result, Err(JwtError::SignatureInvalid));
    }

    #[test]
    fn test_none_algorithm_is_rejected() {
        let token = forge(
            &serde_json::json!({"alg": "none", "typ": "JWT"}),
            &serde_json::json!({"sub": "admin", "iss": "cubetiq", "iat": 0}),
            "",
        );

        let result = TokenValidator::new().validate(&token, SECRET);
        assert_eq!(result, Err(JwtError::AlgorithmMismatch("none".to_string())));
    }

    #[test]
    fn test_asymmetric_algorithm_is_rejected() {
        let token = forge(
            &serde_json::json!({"alg": "RS256", "typ": "JWT"}),
            &serde_json::json!({"sub": "admin", "iss": "cubetiq", "iat": 0}),
            "c2lnbmF0dXJl",
        );

        let result = TokenValidator::new().validate(&token, SECRET);
        assert!(matches!(result, Err(JwtError::AlgorithmMismatch(_))));
    }

    #[test]
    fn test_other_hmac_variant_is_rejected() {
        let token = forge(
            &serde_json::json!({"alg": "HS512", "typ": "JWT"}),
            &serde_json::json!({"sub": "admin", "iss": "cubetiq", "iat": 0}),
            "c2lnbmF0dXJl",
        );

        let result = TokenValidator::new().validate(&token, SECRET);
        assert_eq!(result, Err(JwtError::AlgorithmMismatch("HS512".to_string())));
    }

    #[test]
    fn test_missing_subject_is_malformed_claims() {
        let mut claims = serde_json::Map::new();
        claims.insert("iss".to_string(), serde_json::json!("cubetiq"));
        claims.insert("iat".to_string(), serde_json::json!(Utc::now().timestamp()));

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(SIGNING_ALGORITHM),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new().validate(&token, SECRET);
        assert!(matches!(result, Err(JwtError::MalformedClaims(_))));
    }

    #[test]
    fn test_wrongly_typed_subject_is_malformed_claims() {
        let claims = serde_json::json!({"sub": 42, "iss": "cubetiq", "iat": 0});

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(SIGNING_ALGORITHM),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new().validate(&token, SECRET);
        assert!(matches!(result, Err(JwtError::MalformedClaims(_))));
    }

    #[test]
    fn test_issued_after_expiry_is_malformed_claims() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 0);
        let mut claims = issuer.build_claims(user(), Utc::now());
        claims.exp = Some(claims.iat - 10);
        let token = issuer.sign(SECRET, &claims).unwrap();

        let result = TokenValidator::new().validate(&token, SECRET);
        assert!(matches!(result, Err(JwtError::MalformedClaims(_))));
    }

    #[test]
    fn test_structurally_invalid_tokens() {
        let validator = TokenValidator::new();

        for token in ["", "invalid", "invalid.token", "a.b.c.d", "invalid.token.here"] {
            let result = validator.validate(token, SECRET);
            assert!(
                matches!(result, Err(JwtError::MalformedToken(_))),
                "{token:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 1);
        let now = Utc::now();
        let token = issuer.issue_at(SECRET, user(), now).unwrap();
        let validator = TokenValidator::new();

        let first = validator.validate_at(&token, SECRET, now);
        let second = validator.validate_at(&token, SECRET, now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_inspect_unverified() {
        let issuer = TokenIssuer::with_expiration_hours("cubetiq", 1);
        let token = issuer
            .issue(b"secret1_at_least_32_bytes_long_key!", user())
            .unwrap();

        let claims = TokenValidator::new()
            .inspect_unverified(&token)
            .expect("Failed to inspect token");
        assert_eq!(claims.sub, "user123");
    }
}
