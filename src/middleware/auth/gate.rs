//! Bearer credential 検証 → IdentityCtx を extensions に入れる
//!
//! 判定順:
//! 1. fake identity override が有効、かつ `X-Fake-User-Addr` が空でない
//!    → header の値をそのまま信用する (署名検証はしない)
//! 2. `Authorization: <scheme> <credential>` を 1 文字の空白で分割し、ちょうど 2 つであること
//! 3. credential を ClaimsVerifier で検証
//!
//! どの段階の失敗も client には同じ 401 ("bearer token is not correct") を返す。

use std::{fmt, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::IdentityCtx;
use crate::error::AppError;
use crate::services::auth::claims::ClaimsVerifier;
use crate::services::auth::error::{AuthError, TokenInvalidReason};
use crate::state::AppState;

pub const HEADER_FAKE_USER_ADDR: &str = "x-fake-user-addr";
pub const HEADER_FAKE_ROLE: &str = "x-fake-role";

/// Decides whether a request may continue and with which identity.
///
/// Shared by every request; holds no mutable state.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn ClaimsVerifier>,
    allow_fake_identity: bool,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("allow_fake_identity", &self.allow_fake_identity)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Every request must carry a verifiable credential.
    pub fn new(verifier: Arc<dyn ClaimsVerifier>) -> Self {
        Self {
            verifier,
            allow_fake_identity: false,
        }
    }

    /// Non-production only: requests carrying `X-Fake-User-Addr` skip
    /// verification entirely and are trusted as-is.
    pub fn with_insecure_fake_identity(verifier: Arc<dyn ClaimsVerifier>) -> Self {
        tracing::warn!(
            "fake identity override is ENABLED: X-Fake-User-Addr / X-Fake-Role are trusted without verification"
        );
        Self {
            verifier,
            allow_fake_identity: true,
        }
    }

    pub fn allows_fake_identity(&self) -> bool {
        self.allow_fake_identity
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<IdentityCtx, AuthError> {
        if self.allow_fake_identity {
            if let Some(identity) = fake_identity(headers) {
                tracing::warn!(issuer = %identity.issuer(), "fake identity override used");
                return Ok(identity);
            }
        }

        // Missing or non-UTF-8 header is handled like an empty one: one segment.
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let credential = credential_from_header(authorization)?;
        let claims = self.verifier.verify(credential)?;

        Ok(claims.into())
    }
}

/// Split `<scheme> <credential>` on a single space. The scheme is not interpreted.
fn credential_from_header(value: &str) -> Result<&str, AuthError> {
    let segments: Vec<&str> = value.split(' ').collect();

    match segments.as_slice() {
        [_scheme, credential] => Ok(*credential),
        _ => Err(AuthError::token_invalid(
            TokenInvalidReason::MalformedHeader {
                segments: segments.len(),
            },
        )),
    }
}

fn fake_identity(headers: &HeaderMap) -> Option<IdentityCtx> {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
    };

    let issuer = header_str(HEADER_FAKE_USER_ADDR)?;
    let roles: Vec<String> = header_str(HEADER_FAKE_ROLE)
        .map(|roles| roles.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    Some(IdentityCtx::new(issuer, roles))
}

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::gate::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match state.auth_gate.authenticate(req.headers()) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(
                reason = ?err.reason(),
                "bearer authentication failed"
            );
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    identity.attach(req.extensions_mut());

    Ok(next.run(req).await)
}
