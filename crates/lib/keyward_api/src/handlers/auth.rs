//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginPayload, LoginRequest, RegisterRequest, RegisterResponse, WhoAmIResponse};
use crate::services::auth;

/// `POST /auth/login` — authenticate with username + password.
///
/// Always answers 200; the outcome is carried in the payload's `status`.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Json<LoginPayload> {
    Json(auth::login(&state.authenticator, &body.username, &body.password).await)
}

/// `POST /auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let resp = auth::register(&state.authenticator, &body.username, &body.password).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /auth/me` — echo the verified token subject. Requires authentication.
pub async fn whoami_handler(
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        sub: claims.sub,
        exp: claims.exp,
    })
}
