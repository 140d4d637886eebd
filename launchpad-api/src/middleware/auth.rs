use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use launchpad_core::RequestContext;

use crate::{error::AppError, state::AppState};

/// Resolves the caller once per request and attaches a fresh
/// [`RequestContext`] to the request extensions.
///
/// A missing or malformed credential yields an anonymous context; each
/// handler decides whether it needs a user.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credential = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let ctx = RequestContext::resolve(&state.services, credential.as_deref()).await?;
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
