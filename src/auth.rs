use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{error::ApiError, handlers::rest::AppState};

/// Bearer-token middleware for every `/api` route. Runs before any store
/// access; a missing, malformed, or mismatched token terminates the request
/// with 401.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let supplied = bearer_token(&request).ok_or(ApiError::Unauthorized)?;

    if supplied != state.api_token.as_ref() {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
