pub mod models;

pub use models::launch::{Launch, LaunchId, Mission, PatchSize, Rocket};
pub use models::user::{User, UserId};
