pub mod claims;
pub mod error;
pub mod factory;
pub mod roles;

pub use claims::{Claims, ClaimsVerifier, Ed25519ClaimsVerifier};
pub use error::AuthError;
pub use factory::build_auth_gate;
pub use roles::{ROLE_ADMIN, ROLE_SUPERADMIN, ROLE_USER, Role, has_role};
