use crate::error::ApiError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domain::UserId;
use shared::{bearer_token, AuthError};

/// 認証済みの呼び出し元。
///
/// ハンドラの引数に置くと、本体より先に Bearer トークンが検証される。
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::InvalidScheme)?;

        let claims = state.tokens.validate_token(bearer_token(header)?)?;

        Ok(Self {
            user_id: UserId::from_string(claims.sub),
        })
    }
}
