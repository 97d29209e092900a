use axum::{
    Json,
    extract::{Extension, State},
};

use crate::{
    AppState,
    error::AppError,
    models::Token,
    result::ApiResult,
    routes::ApiJson,
    store::StoreError,
};

use super::model::{LoginRequest, LoginResponse};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = match state.stores.users.find_by_username(&req.username).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::debug!("Login attempt for unknown user {:?}", req.username);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(e) => return Err(AppError::from_store(e, INVALID_CREDENTIALS, "Failed to log in")),
    };

    if !user.verify_login(&req.password) {
        tracing::debug!("Wrong password for {}", user.username);
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = Token::issue(user.id, state.config.token_expiration());
    state
        .stores
        .tokens
        .create(&token)
        .await
        .map_err(|e| AppError::from_store(e, "Failed to create session", "Failed to create session"))?;

    if let Err(e) = state.stores.users.record_login(user.id).await {
        tracing::warn!("Failed to record last login for {}: {}", user.username, e);
    }

    tracing::info!("User {} logged in", user.username);
    Ok(Json(LoginResponse {
        success: true,
        token: token.value,
        expires_at: token.expires_at,
    }))
}

/// Revokes the token that authorized this request.
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<Token>,
) -> Result<Json<ApiResult<()>>, AppError> {
    state
        .stores
        .tokens
        .revoke(&token.value)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => AppError::validation("Token not found or already revoked"),
            source => AppError::Storage {
                message: "Failed to log out".to_string(),
                source,
            },
        })?;

    Ok(ApiResult::message("Logged out successfully"))
}
