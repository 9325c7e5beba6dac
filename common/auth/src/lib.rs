pub mod bearer;
pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod key_store;
pub mod roles;

pub use bearer::{bearer_from_headers, parse_bearer};
pub use claims::Claims;
pub use codec::TokenCodec;
pub use config::{TokenConfig, DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS};
pub use error::{AuthError, AuthResult};
pub use key_store::{SigningKey, SigningKeyStore, MIN_SECRET_BYTES};
pub use roles::{authorities, Role, UnknownRole};
