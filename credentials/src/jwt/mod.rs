pub mod bearer;
pub mod claims;
pub mod errors;
pub mod issuer;
pub mod validator;

pub use bearer::extract_bearer;
pub use bearer::AUTHORIZATION_HEADER;
pub use bearer::BEARER_PREFIX;
pub use claims::Claims;
pub use claims::Identity;
pub use claims::SharedResource;
pub use errors::BearerError;
pub use errors::JwtError;
pub use issuer::TokenIssuer;
pub use issuer::SIGNING_ALGORITHM;
pub use validator::TokenValidator;
