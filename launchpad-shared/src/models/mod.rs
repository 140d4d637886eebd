pub mod launch;
pub mod user;
