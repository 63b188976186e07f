use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

const OWNER_KEY: &str = "owner_key";
const RESOURCE_IDS: &str = "file_ids";

/// Payload names owned by the typed fields; extensions may not reuse them.
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "username", "iss", "iat", "exp"];

/// Identity a token is issued for.
///
/// Each variant maps onto the same flat [`Claims`] shape, so signing and
/// parsing are shared between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Registered user with a stable id and a display username.
    User { id: String, username: String },

    /// Principal known only by username.
    Username(String),

    /// Access grant over a set of shared resources, keyed by their owner.
    SharedResource {
        owner_key: String,
        resource_ids: Vec<String>,
    },
}

/// Shared-resource grant read back from a token's extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedResource {
    pub owner_key: String,
    pub resource_ids: Vec<String>,
}

/// Claims carried inside a token.
///
/// Identity and timing fields are typed; anything variant-specific lives in
/// `extensions`, which is flattened into the token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (stable principal identifier)
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp); absent means the token never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Build claims for an identity.
    ///
    /// # Arguments
    /// * `identity` - Principal the token describes
    /// * `issuer` - Issuing authority
    /// * `issued_at` - Issuance instant
    /// * `expires_at` - Expiry instant, `None` for a token that never expires
    pub fn for_identity(
        identity: Identity,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut extensions = HashMap::new();

        let (sub, username) = match identity {
            Identity::User { id, username } => (id, Some(username)),
            Identity::Username(username) => (username.clone(), Some(username)),
            Identity::SharedResource {
                owner_key,
                resource_ids,
            } => {
                extensions.insert(OWNER_KEY.to_string(), serde_json::json!(owner_key));
                extensions.insert(RESOURCE_IDS.to_string(), serde_json::json!(resource_ids));
                (owner_key, None)
            }
        };

        Self {
            sub,
            username,
            iss: issuer.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.map(|at| at.timestamp()),
            extensions,
        }
    }

    /// Add a custom field.
    ///
    /// # Errors
    /// * `SigningError` - Key is a reserved claim name, or value cannot be represented as JSON
    pub fn try_with_extension(
        mut self,
        key: impl ToString,
        value: impl Serialize,
    ) -> Result<Self, JwtError> {
        let key = key.to_string();
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return Err(JwtError::SigningError(format!(
                "extension key `{}` is a reserved claim",
                key
            )));
        }

        let value = serde_json::to_value(value)
            .map_err(|e| JwtError::SigningError(format!("extension is not serializable: {}", e)))?;
        self.extensions.insert(key, value);
        Ok(self)
    }

    /// First extension key that collides with a typed claim, if any.
    pub fn reserved_extension(&self) -> Option<&str> {
        self.extensions
            .keys()
            .map(String::as_str)
            .find(|key| RESERVED_CLAIMS.contains(key))
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Shared-resource grant, if this token carries one.
    pub fn shared_resource(&self) -> Option<SharedResource> {
        let owner_key = self.extensions.get(OWNER_KEY)?.as_str()?.to_string();
        let resource_ids =
            serde_json::from_value(self.extensions.get(RESOURCE_IDS)?.clone()).ok()?;

        Some(SharedResource {
            owner_key,
            resource_ids,
        })
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.is_some_and(|exp| exp < current_timestamp)
    }

    /// Timing fields are consistent: issuance never after expiry.
    pub fn has_consistent_timing(&self) -> bool {
        self.exp.map_or(true, |exp| self.iat <= exp)
    }
}
