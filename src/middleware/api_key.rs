use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::AppState;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Guards write routes behind the configured `X-Api-Key`
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected_key = state.config.api_key.as_bytes();

    let provided_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Write attempted without API key");
            StatusCode::UNAUTHORIZED
        })?;

    if expected_key.ct_eq(provided_key.as_bytes()).into() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Write attempted with wrong API key");
        Err(StatusCode::UNAUTHORIZED)
    }
}
