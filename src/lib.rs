//! Bearer credential gate for axum services.
//!
//! - `middleware::auth::AuthGate` verifies `Authorization: <scheme> <credential>`
//!   (Ed25519-signed JWT) and attaches an `IdentityCtx` to the request.
//! - `api::v1::extractors` exposes the context and role resolution to handlers.
//! - `services::auth::roles` holds the role vocabulary and `has_role`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
