use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{AppState, error::AppError, store::StoreError};

/// Path prefixes reachable without a bearer token.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &["/api/login", "/health", "/docs", "/swagger"];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Requires `Authorization: Bearer <token>` naming an active token on every
/// non-public path. The resolved [`Token`](crate::models::Token) is attached
/// to the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS || is_public_path(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::unauthorized("Missing or invalid Authorization header"))?;

    let value = bearer.token().trim();
    if value.is_empty() {
        return Err(AppError::unauthorized("Invalid token"));
    }

    let token = match state.stores.tokens.find_active(value).await {
        Ok(token) => token,
        Err(StoreError::NotFound(_)) => {
            tracing::debug!("Rejected unknown, revoked or expired token");
            return Err(AppError::unauthorized("Token expired or invalid"));
        }
        Err(source) => {
            return Err(AppError::Storage {
                message: "Failed to verify token".to_string(),
                source,
            });
        }
    };

    req.extensions_mut().insert(token);
    Ok(next.run(req).await)
}
