//! Fakes for unit tests.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use launchpad_shared::{Launch, LaunchId, Mission, Rocket, User, UserId};
use tokio::sync::Mutex;

use crate::{
    repository::{LaunchProvider, UserStore},
    CoreError, CoreResult,
};

pub fn launch(id: LaunchId) -> Launch {
    Launch {
        id,
        site: Some("CCAFS SLC 40".to_string()),
        mission: Some(Mission {
            name: Some(format!("Mission {}", id)),
            mission_patch_small: Some(format!("https://patches.example.com/{}-small.png", id)),
            mission_patch_large: Some(format!("https://patches.example.com/{}-large.png", id)),
        }),
        rocket: Some(Rocket {
            id: "falcon9".to_string(),
            name: Some("Falcon 9".to_string()),
            rocket_type: Some("FT".to_string()),
        }),
    }
}

pub struct MemoryLaunches {
    launches: Vec<Launch>,
}

impl MemoryLaunches {
    pub fn with_ids(ids: impl IntoIterator<Item = LaunchId>) -> Self {
        Self { launches: ids.into_iter().map(launch).collect() }
    }
}

#[async_trait]
impl LaunchProvider for MemoryLaunches {
    async fn fetch_all(&self) -> CoreResult<Vec<Launch>> {
        Ok(self.launches.clone())
    }

    async fn fetch_by_id(&self, id: LaunchId) -> CoreResult<Option<Launch>> {
        Ok(self.launches.iter().find(|l| l.id == id).cloned())
    }
}

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    trips: HashMap<UserId, BTreeSet<LaunchId>>,
}

#[derive(Default)]
pub struct MemoryUsers {
    state: Mutex<State>,
    failing: bool,
}

impl MemoryUsers {
    pub fn failing() -> Self {
        Self { failing: true, ..Default::default() }
    }

    pub async fn count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    fn check(&self) -> CoreResult<()> {
        if self.failing {
            return Err(CoreError::Store("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_or_create(&self, email: &str) -> CoreResult<User> {
        self.check()?;
        let mut state = self.state.lock().await;
        let user = state
            .users
            .entry(email.to_string())
            .or_insert_with(|| User::new(email.to_string()));
        Ok(user.clone())
    }

    async fn launch_ids_by_user(&self, user_id: UserId) -> CoreResult<BTreeSet<LaunchId>> {
        self.check()?;
        Ok(self.state.lock().await.trips.get(&user_id).cloned().unwrap_or_default())
    }

    async fn is_booked(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool> {
        self.check()?;
        let state = self.state.lock().await;
        Ok(state.trips.get(&user_id).is_some_and(|trips| trips.contains(&launch_id)))
    }

    async fn add_trips(&self, user_id: UserId, launch_ids: &[LaunchId]) -> CoreResult<Vec<LaunchId>> {
        self.check()?;
        let mut state = self.state.lock().await;
        state.trips.entry(user_id).or_default().extend(launch_ids.iter().copied());
        Ok(launch_ids.to_vec())
    }

    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> CoreResult<bool> {
        self.check()?;
        let mut state = self.state.lock().await;
        Ok(state.trips.get_mut(&user_id).is_some_and(|trips| trips.remove(&launch_id)))
    }
}
