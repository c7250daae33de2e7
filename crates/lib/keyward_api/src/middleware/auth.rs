//! Authentication middleware — Bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use crate::error::AppError;
use crate::services::auth::{TokenClaims, verify_access_token};

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    // Auth schemes are case-insensitive (RFC 9110 §11.1).
    let token = match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => token.trim(),
        _ => return Err(AppError::Unauthorized("Invalid authorization scheme".into())),
    };

    let claims = verify_access_token(
        token,
        state.config.jwt_secret.as_bytes(),
        state.config.jwt_issuer.as_deref(),
    )
    .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    debug!(subject = %claims.sub, "bearer token accepted");
    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}
