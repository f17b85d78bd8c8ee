use axum::extract::FromRequestParts;
use axum::http::{Extensions, request::Parts};

use crate::error::AppError;
use crate::services::auth::error::{AuthError, TokenInvalidReason};
use crate::services::auth::roles::{self, Role};

use super::IdentityCtx;

/// Request の IdentityCtx から (role, issuer) を取り出す
///
/// - IdentityCtx が無い (middleware 未設定) → TokenInvalid
/// - roles の解決ルールは `roles::resolve_role` を参照
pub fn resolve_role_and_issuer(extensions: &Extensions) -> Result<(Role, String), AuthError> {
    let ctx = IdentityCtx::from_extensions(extensions)
        .ok_or(AuthError::token_invalid(TokenInvalidReason::MissingIdentity))?;

    let role = roles::resolve_role(ctx.roles())?;

    Ok((role, ctx.issuer().to_string()))
}

/// Handler で、 IdentityCtx をそのまま受け取るための extractor
/// middleware が IdentityCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct IdentityCtxExtractor(pub IdentityCtx);

impl<S> FromRequestParts<S> for IdentityCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        IdentityCtx::from_extensions(&parts.extensions)
            .cloned()
            .map(IdentityCtxExtractor)
            .ok_or_else(|| AuthError::token_invalid(TokenInvalidReason::MissingIdentity).into())
    }
}

/// 解決済みの role と issuer
///
/// TokenInvalid → 401, NotEnoughRights → 403
#[derive(Debug, Clone)]
pub struct CallerRole {
    pub role: Role,
    pub issuer: String,
}

impl CallerRole {
    pub fn is_any_of(&self, allowed: &[&str]) -> bool {
        roles::has_role(self.role.as_str(), allowed)
    }
}

impl<S> FromRequestParts<S> for CallerRole
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (role, issuer) = resolve_role_and_issuer(&parts.extensions).map_err(|err| {
            tracing::debug!(error = %err, reason = ?err.reason(), "role resolution failed");
            AppError::from(err)
        })?;

        Ok(CallerRole { role, issuer })
    }
}
