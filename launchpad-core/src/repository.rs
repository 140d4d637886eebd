use std::collections::BTreeSet;

use async_trait::async_trait;
use launchpad_shared::{Launch, LaunchId, User, UserId};

use crate::CoreResult;

/// Read-only source of launch records
#[async_trait]
pub trait LaunchProvider: Send + Sync {
    /// All launches in the provider's (chronological) order.
    async fn fetch_all(&self) -> CoreResult<Vec<Launch>>;

    async fn fetch_by_id(&self, id: LaunchId) -> CoreResult<Option<Launch>>;
}

/// Persistent users and their booked trips
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the user registered under `email`, creating it if absent.
    /// Concurrent calls for the same email must yield a single record.
    async fn find_or_create(&self, email: &str) -> CoreResult<User>;

    async fn launch_ids_by_user(&self, user_id: UserId) -> CoreResult<BTreeSet<LaunchId>>;

    async fn is_booked(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool>;

    /// Set-union of `launch_ids` into the user's trips. Returns the requested
    /// ids that are booked once the call completes.
    async fn add_trips(&self, user_id: UserId, launch_ids: &[LaunchId]) -> CoreResult<Vec<LaunchId>>;

    /// Returns `false` when the trip was not booked.
    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool>;
}
