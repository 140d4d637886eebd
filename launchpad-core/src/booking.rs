use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use launchpad_shared::{Launch, LaunchId, User, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

use crate::{
    identity::{encode_token, IdentityResolver},
    launches::LaunchRepository,
    repository::UserStore,
    CoreResult,
};

pub const TRIPS_BOOKED: &str = "trips booked successfully";
pub const TRIP_CANCELLED: &str = "trip cancelled";
pub const CANCEL_FAILED: &str = "failed to cancel trip";

/// Outcome of a book or cancel operation. Partial failures are reported
/// here, never as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct TripUpdateResult {
    pub success: bool,
    pub message: Option<String>,
    pub launches: Vec<Launch>,
}

impl TripUpdateResult {
    pub fn booked(launches: Vec<Launch>) -> Self {
        Self {
            success: true,
            message: Some(TRIPS_BOOKED.to_string()),
            launches,
        }
    }

    pub fn partially_booked(failed: &[LaunchId], launches: Vec<Launch>) -> Self {
        let ids = failed.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        Self {
            success: false,
            message: Some(format!("the following launches couldn't be booked: {}", ids)),
            launches,
        }
    }

    pub fn cancelled(launches: Vec<Launch>) -> Self {
        Self {
            success: true,
            message: Some(TRIP_CANCELLED.to_string()),
            launches,
        }
    }

    pub fn cancel_failed() -> Self {
        Self {
            success: false,
            message: Some(CANCEL_FAILED.to_string()),
            launches: Vec::new(),
        }
    }
}

type LockMap = Arc<SyncMutex<HashMap<UserId, Arc<Mutex<()>>>>>;

/// One async lock per user, so book/cancel calls for the same user run one
/// at a time.
#[derive(Clone, Default)]
struct UserLocks {
    locks: LockMap,
}

impl UserLocks {
    async fn acquire(&self, user_id: UserId) -> UserLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(user_id).or_default().clone()
        };
        let mut held = UserLockGuard {
            user_id,
            locks: self.locks.clone(),
            guard: None,
        };
        held.guard = Some(lock.lock_owned().await);
        held
    }

    fn is_empty(&self) -> bool {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

/// Holds a user's lock. Dropping it, including when the owning future is
/// cancelled, releases the lock and forgets it once no one else waits.
struct UserLockGuard {
    user_id: UserId,
    locks: LockMap,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map still references an idle lock.
        if locks.get(&self.user_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.user_id);
        }
    }
}

/// Login and trip bookkeeping for users.
#[derive(Clone)]
pub struct BookingEngine {
    launches: LaunchRepository,
    users: Arc<dyn UserStore>,
    identity: IdentityResolver,
    locks: UserLocks,
}

impl BookingEngine {
    pub fn new(launches: LaunchRepository, users: Arc<dyn UserStore>) -> Self {
        Self {
            identity: IdentityResolver::new(users.clone()),
            launches,
            users,
            locks: UserLocks::default(),
        }
    }

    /// Returns a login token for `email`, or `None` if the address is not
    /// plausible. Registers the user on first login.
    pub async fn login(&self, email: &str) -> CoreResult<Option<String>> {
        let Some(user) = self.identity.find_or_create(email).await? else {
            return Ok(None);
        };
        info!("User {} logged in", user.id);
        Ok(Some(encode_token(&user.email)))
    }

    pub async fn book_trips(&self, user: &User, launch_ids: &[LaunchId]) -> CoreResult<TripUpdateResult> {
        let mut requested: Vec<LaunchId> = Vec::with_capacity(launch_ids.len());
        for id in launch_ids {
            if !requested.contains(id) {
                requested.push(*id);
            }
        }

        let (booked, launches) = {
            let _lock = self.locks.acquire(user.id).await;
            self.book_locked(user, &requested).await?
        };

        let failed: Vec<LaunchId> = requested
            .iter()
            .filter(|id| !booked.contains(id))
            .copied()
            .collect();

        if failed.is_empty() {
            info!("User {} booked trips {:?}", user.id, booked);
            Ok(TripUpdateResult::booked(launches))
        } else {
            info!("User {} could not book trips {:?}", user.id, failed);
            Ok(TripUpdateResult::partially_booked(&failed, launches))
        }
    }

    async fn book_locked(&self, user: &User, requested: &[LaunchId]) -> CoreResult<(Vec<LaunchId>, Vec<Launch>)> {
        let launches = self.launches.get_by_ids(requested).await?;
        let bookable: Vec<LaunchId> = launches.iter().map(|launch| launch.id).collect();
        let booked = if bookable.is_empty() {
            Vec::new()
        } else {
            self.users.add_trips(user.id, &bookable).await?
        };
        Ok((booked, launches))
    }

    pub async fn cancel_trip(&self, user: &User, launch_id: LaunchId) -> CoreResult<TripUpdateResult> {
        let removed = {
            let _lock = self.locks.acquire(user.id).await;
            self.users.remove_trip(user.id, launch_id).await?
        };

        if !removed {
            info!("User {} has no trip {} to cancel", user.id, launch_id);
            return Ok(TripUpdateResult::cancel_failed());
        }

        info!("User {} cancelled trip {}", user.id, launch_id);
        let launches = self.launches.get_by_id(launch_id).await?.into_iter().collect();
        Ok(TripUpdateResult::cancelled(launches))
    }

    /// Booked launches for `user`. Launches the provider no longer knows
    /// about are left out.
    pub async fn trips(&self, user: &User) -> CoreResult<Vec<Launch>> {
        let ids: Vec<LaunchId> = self.users.launch_ids_by_user(user.id).await?.into_iter().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.launches.get_by_ids(&ids).await
    }

    pub async fn is_booked(&self, user: &User, launch_id: LaunchId) -> CoreResult<bool> {
        self.users.is_booked(user.id, launch_id).await
    }
}
