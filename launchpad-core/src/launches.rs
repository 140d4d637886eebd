use std::sync::Arc;

use futures_util::future::try_join_all;
use launchpad_shared::{Launch, LaunchId};

use crate::{repository::LaunchProvider, CoreResult};

/// Read-through access to the launch provider.
#[derive(Clone)]
pub struct LaunchRepository {
    provider: Arc<dyn LaunchProvider>,
}

impl LaunchRepository {
    pub fn new(provider: Arc<dyn LaunchProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_all(&self) -> CoreResult<Vec<Launch>> {
        self.provider.fetch_all().await
    }

    pub async fn get_by_id(&self, id: LaunchId) -> CoreResult<Option<Launch>> {
        let launch = self.provider.fetch_by_id(id).await?;
        if launch.is_none() {
            tracing::warn!("Launch {} not found at provider", id);
        }
        Ok(launch)
    }

    /// Fetches the given ids concurrently. Unknown ids are dropped; the
    /// survivors keep the order they were requested in.
    pub async fn get_by_ids(&self, ids: &[LaunchId]) -> CoreResult<Vec<Launch>> {
        let lookups = ids.iter().map(|id| self.get_by_id(*id));
        let found = try_join_all(lookups).await?;
        Ok(found.into_iter().flatten().collect())
    }
}
