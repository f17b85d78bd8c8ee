//! CORS policy for browser clients.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials.
//! - Production: allowlist origins from Config (comma-separated env var), WITHOUT credentials.
//! - `X-Fake-User-Addr` / `X-Fake-Role` are allowed request headers only while
//!   the fake identity override is enabled.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::auth::{AuthGate, HEADER_FAKE_ROLE, HEADER_FAKE_USER_ADDR};
use crate::middleware::http::REQUEST_ID_HEADER;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine wildcard origin (`Any`) with `allow_credentials(true)`.
pub fn apply(router: Router, config: &Config, gate: &AuthGate) -> Router {
    let cors = if config.app_env.is_production() {
        // An empty allowlist allows no origin at all.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        });

        CorsLayer::new().allow_origin(allow_origin)
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers(allowed_headers(gate))
    .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}

fn allowed_headers(gate: &AuthGate) -> Vec<HeaderName> {
    let mut headers = vec![
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ];

    if gate.allows_fake_identity() {
        headers.push(HeaderName::from_static(HEADER_FAKE_USER_ADDR));
        headers.push(HeaderName::from_static(HEADER_FAKE_ROLE));
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::claims::{Claims, ClaimsError, ClaimsVerifier};
    use std::sync::Arc;

    struct RejectAll;

    impl ClaimsVerifier for RejectAll {
        fn verify(&self, _credential: &str) -> Result<Claims, ClaimsError> {
            Err(ClaimsError::InvalidKey("unused".into()))
        }
    }

    #[test]
    fn fake_headers_only_allowed_with_override() {
        let fake = HeaderName::from_static(HEADER_FAKE_USER_ADDR);
        let strict = AuthGate::new(Arc::new(RejectAll));
        let bypass = AuthGate::with_insecure_fake_identity(Arc::new(RejectAll));

        assert!(!allowed_headers(&strict).contains(&fake));
        assert!(allowed_headers(&bypass).contains(&fake));
        assert!(allowed_headers(&strict).contains(&header::AUTHORIZATION));
    }
}
