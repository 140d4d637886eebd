use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use launchpad_api::{app, AppState};
use launchpad_core::{Services, UserStore};
use launchpad_store::{app_config::Config, DbClient, InMemoryUserStore, PostgresUserStore, SpaceXLaunchProvider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "launchpad_api=debug,launchpad_core=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Launchpad API on port {}", config.server.port);

    let users: Arc<dyn UserStore> = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            Arc::new(PostgresUserStore::new(db.pool.clone()))
        }
        None => {
            tracing::warn!("No database configured, users will be kept in memory");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let provider = SpaceXLaunchProvider::new(
        &config.launches.base_url,
        Duration::from_secs(config.launches.request_timeout_seconds),
    )
    .context("Failed to build launch provider client")?;

    let services = Services::new(Arc::new(provider), users)
        .with_default_page_size(config.launches.default_page_size);
    let app_state = AppState::new(services)
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_seconds));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
