use axum::{routing::get, Extension, Json, Router};
use futures_util::future::try_join_all;
use launchpad_core::{resolvers, RequestContext};
use launchpad_shared::{Launch, LaunchId, PatchSize, Rocket};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    extract::{Path, Query},
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSizeQuery {
    pub patch_size: Option<PatchSize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchesQuery {
    pub page_size: Option<i64>,
    pub after: Option<String>,
    pub patch_size: Option<PatchSize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConnection {
    pub cursor: Option<String>,
    pub has_more: bool,
    pub launches: Vec<LaunchView>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchView {
    pub id: LaunchId,
    pub site: Option<String>,
    pub mission: Option<MissionView>,
    pub rocket: Option<Rocket>,
    pub is_booked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionView {
    pub name: Option<String>,
    pub mission_patch: Option<String>,
}

/// Resolves the derived fields of a launch for the current caller.
pub(crate) async fn launch_view(
    ctx: &RequestContext,
    launch: Launch,
    patch_size: Option<PatchSize>,
) -> Result<LaunchView, AppError> {
    let is_booked = resolvers::is_booked(ctx, &launch).await?;
    let mission = launch.mission.as_ref().map(|mission| MissionView {
        name: mission.name.clone(),
        mission_patch: resolvers::mission_patch(mission, patch_size).map(str::to_owned),
    });

    Ok(LaunchView {
        id: launch.id,
        site: launch.site,
        mission,
        rocket: launch.rocket,
        is_booked,
    })
}

pub(crate) async fn launch_views(
    ctx: &RequestContext,
    launches: Vec<Launch>,
    patch_size: Option<PatchSize>,
) -> Result<Vec<LaunchView>, AppError> {
    try_join_all(launches.into_iter().map(|launch| launch_view(ctx, launch, patch_size))).await
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/launches", get(list_launches))
        .route("/launches/{id}", get(get_launch))
}

async fn list_launches(
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<LaunchesQuery>,
) -> Result<Json<LaunchConnection>, AppError> {
    let page = resolvers::launches(&ctx, query.page_size, query.after.as_deref()).await?;

    Ok(Json(LaunchConnection {
        cursor: page.cursor,
        has_more: page.has_more,
        launches: launch_views(&ctx, page.items, query.patch_size).await?,
    }))
}

async fn get_launch(
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<LaunchId>,
    Query(query): Query<PatchSizeQuery>,
) -> Result<Json<LaunchView>, AppError> {
    let launch = resolvers::launch(&ctx, id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Launch {} not found", id)))?;

    Ok(Json(launch_view(&ctx, launch, query.patch_size).await?))
}
