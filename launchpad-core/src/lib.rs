pub mod pagination;
pub mod identity;
pub mod repository;
pub mod launches;
pub mod booking;
pub mod context;
pub mod resolvers;

#[cfg(test)]
pub(crate) mod testing;

pub use booking::{BookingEngine, TripUpdateResult};
pub use context::{RequestContext, Services};
pub use launches::LaunchRepository;
pub use pagination::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use repository::{LaunchProvider, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("User store failure: {0}")]
    Store(String),
    #[error("Launch provider failure: {0}")]
    Provider(String),
    #[error("Authentication required")]
    Unauthenticated,
}

pub type CoreResult<T> = Result<T, CoreError>;
