pub mod identity_ctx;

pub use identity_ctx::{CallerRole, IdentityCtx, IdentityCtxExtractor, resolve_role_and_issuer};
