//! # keyward_api
//!
//! HTTP API library for Keyward.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::routing::{get, post};
use keyward_core::auth::Authenticator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health};

/// Route paths.
pub mod routes {
    pub const GET_HEALTH: &str = "/health";
    pub const POST_AUTH_LOGIN: &str = "/auth/login";
    pub const POST_AUTH_REGISTER: &str = "/auth/register";
    pub const GET_AUTH_ME: &str = "/auth/me";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Login orchestrator over the configured credential store.
    pub authenticator: Authenticator,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTH, get(health::health))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::whoami_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
