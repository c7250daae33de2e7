//! Request and response payloads.

use serde::{Deserialize, Serialize};

/// `POST /auth/login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Result field of a [`LoginPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStatus {
    Success,
    Error,
    Failed,
}

/// `POST /auth/login` response, returned for every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub status: LoginStatus,
    pub message: String,
    pub token: Option<String>,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/register` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
}

/// `GET /auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub sub: String,
    pub exp: i64,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
