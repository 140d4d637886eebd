use axum::{routing::post, Extension, Json, Router};
use launchpad_core::{resolvers, RequestContext};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, extract::JsonBody, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Without an email in the body, an already identified caller gets a fresh
/// token for their own address.
async fn login(
    Extension(ctx): Extension<RequestContext>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.or_else(|| ctx.user().map(|user| user.email.clone()));

    let token = match email {
        Some(email) => resolvers::login(&ctx, &email).await?,
        None => None,
    };

    Ok(Json(LoginResponse { token }))
}
