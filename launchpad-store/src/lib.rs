pub mod app_config;
pub mod database;
pub mod user_repo;
pub mod memory;
pub mod spacex;

pub use database::DbClient;
pub use memory::{InMemoryUserStore, StaticLaunchProvider};
pub use spacex::SpaceXLaunchProvider;
pub use user_repo::PostgresUserStore;
