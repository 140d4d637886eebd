use axum::{
    routing::{delete, get, post},
    Extension, Json, Router,
};
use launchpad_core::{resolvers, RequestContext, TripUpdateResult};
use launchpad_shared::{LaunchId, PatchSize, UserId};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    extract::{JsonBody, Path, Query},
    launches::{launch_views, LaunchView, PatchSizeQuery},
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub trips: Vec<LaunchView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTripsRequest {
    pub launch_ids: Vec<LaunchId>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdateResponse {
    pub success: bool,
    pub message: Option<String>,
    pub launches: Vec<LaunchView>,
}

async fn trip_update_response(
    ctx: &RequestContext,
    result: TripUpdateResult,
    patch_size: Option<PatchSize>,
) -> Result<TripUpdateResponse, AppError> {
    Ok(TripUpdateResponse {
        success: result.success,
        message: result.message,
        launches: launch_views(ctx, result.launches, patch_size).await?,
    })
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/trips", post(book_trips))
        .route("/trips/{launch_id}", delete(cancel_trip))
}

async fn me(
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<PatchSizeQuery>,
) -> Result<Json<Option<UserView>>, AppError> {
    let Some(user) = resolvers::me(&ctx) else {
        return Ok(Json(None));
    };

    let trips = resolvers::trips(&ctx).await?;
    Ok(Json(Some(UserView {
        id: user.id,
        email: user.email.clone(),
        trips: launch_views(&ctx, trips, query.patch_size).await?,
    })))
}

async fn book_trips(
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<PatchSizeQuery>,
    JsonBody(req): JsonBody<BookTripsRequest>,
) -> Result<Json<TripUpdateResponse>, AppError> {
    let result = resolvers::book_trips(&ctx, &req.launch_ids).await?;
    Ok(Json(trip_update_response(&ctx, result, query.patch_size).await?))
}

async fn cancel_trip(
    Extension(ctx): Extension<RequestContext>,
    Path(launch_id): Path<LaunchId>,
    Query(query): Query<PatchSizeQuery>,
) -> Result<Json<TripUpdateResponse>, AppError> {
    let result = resolvers::cancel_trip(&ctx, launch_id).await?;
    Ok(Json(trip_update_response(&ctx, result, query.patch_size).await?))
}
