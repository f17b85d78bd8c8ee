/*
 * Responsibility
 * - GET /api/v1/admin/ping
 * - admin / superadmin 以外は 403 (role の判定は handler 側の責務)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::CallerRole;
use crate::error::AppError;
use crate::services::auth::roles::{ROLE_ADMIN, ROLE_SUPERADMIN};

pub async fn admin_ping(caller: CallerRole) -> Result<impl IntoResponse, AppError> {
    if !caller.is_any_of(&[ROLE_ADMIN, ROLE_SUPERADMIN]) {
        tracing::info!(issuer = %caller.issuer, role = %caller.role, "admin route denied");
        return Err(AppError::forbidden());
    }

    Ok((
        StatusCode::OK,
        Json(json!({"status": "ok", "issuer": caller.issuer})),
    ))
}
