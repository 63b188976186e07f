use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;

use crate::password::PasswordParams;

/// Credential settings for a service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cipher: Option<CipherConfig>,
    #[serde(default)]
    pub password: PasswordParams,
}

/// Token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    /// Token lifetime; `0` issues tokens that never expire
    #[serde(default)]
    pub expiration_hours: i64,
}

/// Payload encryption configuration.
#[derive(Deserialize, Clone)]
pub struct CipherConfig {
    /// AES key, 16, 24 or 32 bytes once UTF-8 encoded
    pub secret: String,
}

impl CipherConfig {
    /// Key bytes to pass to [`SymmetricCipher`](crate::SymmetricCipher).
    pub fn key(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("issuer", &self.issuer)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl CredentialsConfig {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (CREDENTIALS__JWT__SECRET, CREDENTIALS__JWT__ISSUER, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: CREDENTIALS__JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("CREDENTIALS").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    /// Parse configuration from TOML text, without file or environment lookup.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        let config = CredentialsConfig::from_toml(
            r#"
            [jwt]
            secret = "test-secret-key-for-jwt-signing-at-least-32-bytes"
            issuer = "cubetiq"
            expiration_hours = 24

            [cipher]
            secret = "0123456789abcdef0123456789abcdef"

            [password]
            memory_kib = 1024
            iterations = 1
            parallelism = 1
            "#,
        )
        .expect("Failed to parse configuration");

        assert_eq!(config.jwt.issuer, "cubetiq");
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.password.iterations, 1);
        assert!(config.cipher.is_some());
    }

    #[test]
    fn test_cipher_key_seals() {
        let config = CredentialsConfig::from_toml(
            r#"
            [jwt]
            secret = "s"
            issuer = "cubetiq"

            [cipher]
            secret = "0123456789abcdef"
            "#,
        )
        .unwrap();

        let key = config.cipher.as_ref().unwrap().key();
        let cipher = crate::SymmetricCipher::new();
        let sealed = cipher.seal(key, b"payload").unwrap();
        assert_eq!(cipher.open(key, &sealed).unwrap(), b"payload");
    }

    #[test]
    fn test_defaults() {
        let config = CredentialsConfig::from_toml(
            r#"
            [jwt]
            secret = "s"
            issuer = "cubetiq"
            "#,
        )
        .expect("Failed to parse configuration");

        assert_eq!(config.jwt.expiration_hours, 0);
        assert_eq!(config.password, PasswordParams::default());
        assert!(config.cipher.is_none());
    }

    #[test]
    fn test_missing_jwt_section() {
        assert!(CredentialsConfig::from_toml("[password]\nmemory_kib = 1024").is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = CredentialsConfig::from_toml(
            r#"
            [jwt]
            secret = "do-not-print-me"
            issuer = "cubetiq"

            [cipher]
            secret = "also-do-not-print-me"
            "#,
        )
        .unwrap();

        let printed = format!("{:?}", config);
        assert!(!printed.contains("do-not-print-me"));
        assert!(printed.contains("cubetiq"));
    }
}
