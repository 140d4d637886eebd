use std::time::Duration;

use async_trait::async_trait;
use launchpad_core::{CoreError, CoreResult, LaunchProvider};
use launchpad_shared::{Launch, LaunchId, Mission, Rocket};
use serde::Deserialize;
use tracing::debug;

/// Launch provider backed by the SpaceX v2 REST API.
pub struct SpaceXLaunchProvider {
    client: reqwest::Client,
    base_url: String,
}

impl SpaceXLaunchProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("launchpad/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn launches_url(&self) -> String {
        format!("{}/launches", self.base_url)
    }

    async fn get_launches(&self, query: &[(&str, String)]) -> CoreResult<Vec<Launch>> {
        let raw: Vec<RawLaunch> = self
            .client
            .get(self.launches_url())
            .query(query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        debug!("Fetched {} launches from provider", raw.len());
        Ok(raw.into_iter().map(Launch::from).collect())
    }
}

fn provider_error(err: reqwest::Error) -> CoreError {
    tracing::error!("Launch provider request failed: {}", err);
    CoreError::Provider(err.to_string())
}

#[async_trait]
impl LaunchProvider for SpaceXLaunchProvider {
    async fn fetch_all(&self) -> CoreResult<Vec<Launch>> {
        self.get_launches(&[]).await
    }

    async fn fetch_by_id(&self, id: LaunchId) -> CoreResult<Option<Launch>> {
        let launches = self.get_launches(&[("flight_number", id.to_string())]).await?;
        Ok(launches.into_iter().next())
    }
}

// Provider payload, only the fields we map.

#[derive(Debug, Deserialize)]
struct RawLaunch {
    flight_number: Option<LaunchId>,
    mission_name: Option<String>,
    launch_site: Option<RawSite>,
    links: Option<RawLinks>,
    rocket: Option<RawRocket>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    site_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLinks {
    mission_patch: Option<String>,
    mission_patch_small: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRocket {
    rocket_id: Option<String>,
    rocket_name: Option<String>,
    rocket_type: Option<String>,
}

impl From<RawLaunch> for Launch {
    fn from(raw: RawLaunch) -> Self {
        let (patch_small, patch_large) = raw
            .links
            .map(|links| (links.mission_patch_small, links.mission_patch))
            .unwrap_or_default();

        Self {
            id: raw.flight_number.unwrap_or(0),
            site: raw.launch_site.and_then(|site| site.site_name),
            mission: Some(Mission {
                name: raw.mission_name,
                mission_patch_small: patch_small,
                mission_patch_large: patch_large,
            }),
            rocket: raw.rocket.map(|rocket| Rocket {
                id: rocket.rocket_id.unwrap_or_default(),
                name: rocket.rocket_name,
                rocket_type: rocket.rocket_type,
            }),
        }
    }
}
