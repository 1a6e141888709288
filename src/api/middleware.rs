use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::error::AppError;

/// Authentication middleware - resolves the bearer token to an `Identity`
/// and stores it in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let identity = state.gate.authenticate(header.as_deref()).await?;
    tracing::debug!(user_id = %identity.id, "authenticated request");

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
