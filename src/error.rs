/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - AuthError を統一的に変換 (TokenInvalid の理由は body に載せない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::error::{AuthError, NOT_ENOUGH_RIGHTS_MESSAGE, TOKEN_INVALID_MESSAGE};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthenticated: {message}")]
    Unauthenticated { message: &'static str },
    #[error("forbidden: {message}")]
    Forbidden { message: &'static str },
}

impl AppError {
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated {
            message: TOKEN_INVALID_MESSAGE,
        }
    }

    pub fn forbidden() -> Self {
        Self::Forbidden {
            message: NOT_ENOUGH_RIGHTS_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthenticated { message } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message.to_string())
            }
            AppError::Forbidden { message } => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", message.to_string())
            }
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            // Parse / signature / missing-context causes all look the same to the client.
            AuthError::TokenInvalid(_) => AppError::unauthenticated(),
            AuthError::NotEnoughRights => AppError::forbidden(),
        }
    }
}
