use aes_gcm::aead::consts::U12;
use aes_gcm::aead::Aead;
use aes_gcm::aead::KeyInit;
use aes_gcm::aes::Aes192;
use aes_gcm::Aes128Gcm;
use aes_gcm::Aes256Gcm;
use aes_gcm::AesGcm;
use aes_gcm::Nonce;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::CipherError;

/// Length of the random nonce prepended to every sealed payload.
pub const NONCE_LEN: usize = 12;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Authenticated encryption of opaque payloads (AES-GCM).
///
/// The caller's secret is used verbatim as the AES key, so its length picks
/// the variant: 16 bytes for AES-128, 24 for AES-192, 32 for AES-256.
/// Sealed payloads are `base64url(nonce || ciphertext || tag)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricCipher;

enum KeyedCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl KeyedCipher {
    fn from_secret(secret: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(secret.len());

        match secret.len() {
            16 => Aes128Gcm::new_from_slice(secret)
                .map(Self::Aes128)
                .map_err(invalid),
            24 => Aes192Gcm::new_from_slice(secret)
                .map(Self::Aes192)
                .map_err(invalid),
            32 => Aes256Gcm::new_from_slice(secret)
                .map(Self::Aes256)
                .map_err(invalid),
            other => Err(CipherError::InvalidKeyLength(other)),
        }
    }

    fn encrypt(&self, nonce: &Nonce<U12>, plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Self::Aes128(cipher) => cipher.encrypt(nonce, plaintext),
            Self::Aes192(cipher) => cipher.encrypt(nonce, plaintext),
            Self::Aes256(cipher) => cipher.encrypt(nonce, plaintext),
        }
    }

    fn decrypt(&self, nonce: &Nonce<U12>, ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Self::Aes128(cipher) => cipher.decrypt(nonce, ciphertext),
            Self::Aes192(cipher) => cipher.decrypt(nonce, ciphertext),
            Self::Aes256(cipher) => cipher.decrypt(nonce, ciphertext),
        }
    }
}

impl SymmetricCipher {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt and authenticate a payload.
    ///
    /// A fresh nonce is drawn from the OS random source on every call, so
    /// sealing the same plaintext twice gives different output.
    ///
    /// # Arguments
    /// * `secret` - Symmetric key (16, 24 or 32 bytes)
    /// * `plaintext` - Bytes to protect
    ///
    /// # Returns
    /// Base64url text of `nonce || ciphertext || tag`
    ///
    /// # Errors
    /// * `InvalidKeyLength` - Secret is not a valid AES key size
    /// * `EntropyUnavailable` - Nonce could not be generated
    /// * `MalformedPayload` - Plaintext is too large for a single seal
    pub fn seal(&self, secret: &[u8], plaintext: &[u8]) -> Result<String, CipherError> {
        let cipher = KeyedCipher::from_secret(secret)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| CipherError::EntropyUnavailable(e.to_string()))?;

        let ciphertext = cipher
            .encrypt(Nonce::<U12>::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| {
                CipherError::MalformedPayload("plaintext exceeds AES-GCM limits".to_string())
            })?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(URL_SAFE.encode(payload))
    }

    /// Authenticate and decrypt a sealed payload.
    ///
    /// # Errors
    /// * `InvalidKeyLength` - Secret is not a valid AES key size
    /// * `MalformedPayload` - Not base64url, or shorter than a nonce
    /// * `AuthenticationFailed` - Tag does not verify (tampering or wrong secret)
    pub fn open(&self, secret: &[u8], sealed: &str) -> Result<Vec<u8>, CipherError> {
        let cipher = KeyedCipher::from_secret(secret)?;

        let payload = URL_SAFE
            .decode(sealed.trim())
            .map_err(|e| CipherError::MalformedPayload(e.to_string()))?;

        if payload.len() < NONCE_LEN {
            return Err(CipherError::MalformedPayload(format!(
                "expected at least {} bytes, got {}",
                NONCE_LEN,
                payload.len()
            )));
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);

        cipher
            .decrypt(Nonce::<U12>::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| {
                tracing::warn!("Sealed payload failed authentication");
                CipherError::AuthenticationFailed
            })
    }

    /// Seal UTF-8 text.
    pub fn seal_str(&self, secret: &[u8], plaintext: &str) -> Result<String, CipherError> {
        self.seal(secret, plaintext.as_bytes())
    }

    /// Open a payload that was sealed from UTF-8 text.
    ///
    /// # Errors
    /// As [`SymmetricCipher::open`], plus `NotUtf8` if the plaintext is not text.
    pub fn open_str(&self, secret: &[u8], sealed: &str) -> Result<String, CipherError> {
        let plaintext = self.open(secret, sealed)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::NotUtf8)
    }
}
