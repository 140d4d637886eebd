//! Operations and derived fields of the public API, evaluated against a
//! per-request context.

use launchpad_shared::{Launch, LaunchId, Mission, PatchSize, User};

use crate::{
    booking::TripUpdateResult,
    context::RequestContext,
    pagination::{paginate, Page},
    CoreResult,
};

/// A page of launches, newest first.
pub async fn launches(ctx: &RequestContext, page_size: Option<i64>, after: Option<&str>) -> CoreResult<Page<Launch>> {
    let services = ctx.services();
    let mut all = services.launches.get_all().await?;
    // Provider order is chronological.
    all.reverse();
    Ok(paginate(&all, after, page_size.unwrap_or(services.default_page_size)))
}

pub async fn launch(ctx: &RequestContext, id: LaunchId) -> CoreResult<Option<Launch>> {
    ctx.services().launches.get_by_id(id).await
}

pub fn me(ctx: &RequestContext) -> Option<&User> {
    ctx.user()
}

pub async fn login(ctx: &RequestContext, email: &str) -> CoreResult<Option<String>> {
    ctx.services().booking.login(email).await
}

pub async fn book_trips(ctx: &RequestContext, launch_ids: &[LaunchId]) -> CoreResult<TripUpdateResult> {
    let user = ctx.require_user()?;
    ctx.services().booking.book_trips(user, launch_ids).await
}

pub async fn cancel_trip(ctx: &RequestContext, launch_id: LaunchId) -> CoreResult<TripUpdateResult> {
    let user = ctx.require_user()?;
    ctx.services().booking.cancel_trip(user, launch_id).await
}

/// False for anonymous callers.
pub async fn is_booked(ctx: &RequestContext, launch: &Launch) -> CoreResult<bool> {
    match ctx.user() {
        Some(user) => ctx.services().booking.is_booked(user, launch.id).await,
        None => Ok(false),
    }
}

pub fn mission_patch(mission: &Mission, size: Option<PatchSize>) -> Option<&str> {
    mission.patch(size.unwrap_or_default())
}

/// The caller's booked launches; empty for anonymous callers.
pub async fn trips(ctx: &RequestContext) -> CoreResult<Vec<Launch>> {
    match ctx.user() {
        Some(user) => ctx.services().booking.trips(user).await,
        None => Ok(Vec::new()),
    }
}
