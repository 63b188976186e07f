pub mod errors;
pub mod gcm;

pub use errors::CipherError;
pub use gcm::SymmetricCipher;
pub use gcm::NONCE_LEN;
