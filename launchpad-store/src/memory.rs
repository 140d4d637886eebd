use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use launchpad_core::{CoreResult, LaunchProvider, UserStore};
use launchpad_shared::{Launch, LaunchId, User, UserId};
use tokio::sync::RwLock;
use tracing::info;

#[derive(Default)]
struct Users {
    by_email: HashMap<String, User>,
    trips: HashMap<UserId, BTreeSet<LaunchId>>,
}

/// Process-local user store. Each operation runs under a single write lock,
/// so find-or-create and trip updates are atomic.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Users>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.by_email.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_or_create(&self, email: &str) -> CoreResult<User> {
        let mut users = self.inner.write().await;
        if let Some(user) = users.by_email.get(email) {
            return Ok(user.clone());
        }
        let user = User::new(email.to_string());
        info!("Created user {}", user.id);
        users.by_email.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn launch_ids_by_user(&self, user_id: UserId) -> CoreResult<BTreeSet<LaunchId>> {
        let users = self.inner.read().await;
        Ok(users.trips.get(&user_id).cloned().unwrap_or_default())
    }

    async fn is_booked(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool> {
        let users = self.inner.read().await;
        Ok(users.trips.get(&user_id).is_some_and(|trips| trips.contains(&launch_id)))
    }

    async fn add_trips(&self, user_id: UserId, launch_ids: &[LaunchId]) -> CoreResult<Vec<LaunchId>> {
        let mut users = self.inner.write().await;
        let trips = users.trips.entry(user_id).or_default();
        trips.extend(launch_ids.iter().copied());
        Ok(launch_ids.to_vec())
    }

    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool> {
        let mut users = self.inner.write().await;
        Ok(users
            .trips
            .get_mut(&user_id)
            .is_some_and(|trips| trips.remove(&launch_id)))
    }
}

/// Serves a fixed set of launches, in the order given.
pub struct StaticLaunchProvider {
    launches: Vec<Launch>,
}

impl StaticLaunchProvider {
    pub fn new(launches: Vec<Launch>) -> Self {
        Self { launches }
    }
}

#[async_trait]
impl LaunchProvider for StaticLaunchProvider {
    async fn fetch_all(&self) -> CoreResult<Vec<Launch>> {
        Ok(self.launches.clone())
    }

    async fn fetch_by_id(&self, id: LaunchId) -> CoreResult<Option<Launch>> {
        Ok(self.launches.iter().find(|launch| launch.id == id).cloned())
    }
}
