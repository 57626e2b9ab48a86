//! Token check for the article routes.
//!
//! The `Authorization` header carries the raw token issued at login. Requests
//! without one, or with a token the server never issued, get a 401.

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Username behind the token of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

pub async fn require_token(
    State(state): State<Arc<ServerState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .unwrap_or_default();

    if token.is_empty() {
        debug!("Rejecting {} without token", request.uri());
        return ApiError::unauthorized("Token required").into_response();
    }

    match state.user_for(&token).await {
        Some(user) => {
            request.extensions_mut().insert(AuthUser(user));
            next.run(request).await
        }
        None => {
            debug!("Rejecting {} with unknown token", request.uri());
            ApiError::unauthorized("Invalid token").into_response()
        }
    }
}
