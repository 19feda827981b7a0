//! 失敗をすべて HTTP ステータスと `{ "error": ... }` に変換する唯一の場所
//!
//! | 失敗 | ステータス |
//! |------|-----------|
//! | 認証情報なし・不正 | 401 |
//! | レコードなし / 不正な ID | 404 |
//! | 所有者以外による変更 | 403 |
//! | 検証エラー | 422 |
//! | それ以外 | 500 |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{DomainError, TODO_ENTITY};
use infrastructure::StoreError;
use serde::{Deserialize, Serialize};
use shared::AuthError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MalformedIdentifier(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// エラーレスポンスのボディ
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::MalformedIdentifier(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// クライアントに返すメッセージ。内部エラーの詳細は出さない
    pub fn message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            DomainError::NotOwned { .. } => ApiError::Forbidden(e.to_string()),
            DomainError::Validation(message) => ApiError::Validation(message),
            DomainError::MalformedIdentifier(_) => ApiError::MalformedIdentifier(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(message) => ApiError::Validation(message),
            StoreError::Missing => DomainError::NotFound {
                entity: TODO_ENTITY,
            }
            .into(),
            StoreError::Backend(message) => ApiError::Internal(message),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
