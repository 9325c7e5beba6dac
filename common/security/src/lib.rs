pub mod context;
pub mod middleware;
pub mod policy;
pub mod roles;

pub use context::{SecurityContext, SecurityCtxExtractor};
pub use middleware::{authenticate, RequestAuthenticator};
pub use policy::{AccessPolicy, PublicRoute};
pub use roles::{authorize, ensure_role, Decision};
