/*
 * Responsibility
 * - GET /api/v1/me
 * - AuthGate が入れた IdentityCtx から解決した role / issuer を返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::CallerRole;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub issuer: String,
    pub role: &'static str,
}

pub async fn me(caller: CallerRole) -> Json<MeResponse> {
    Json(MeResponse {
        issuer: caller.issuer,
        role: caller.role.as_str(),
    })
}
