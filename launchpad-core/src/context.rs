use std::sync::Arc;

use launchpad_shared::User;

use crate::{
    booking::BookingEngine,
    identity::IdentityResolver,
    launches::LaunchRepository,
    pagination::DEFAULT_PAGE_SIZE,
    repository::{LaunchProvider, UserStore},
    CoreError, CoreResult,
};

/// Long-lived data access shared by every request.
#[derive(Clone)]
pub struct Services {
    pub launches: LaunchRepository,
    pub booking: BookingEngine,
    pub identity: IdentityResolver,
    pub default_page_size: i64,
}

impl Services {
    pub fn new(provider: Arc<dyn LaunchProvider>, users: Arc<dyn UserStore>) -> Self {
        let launches = LaunchRepository::new(provider);
        Self {
            booking: BookingEngine::new(launches.clone(), users.clone()),
            identity: IdentityResolver::new(users),
            launches,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, page_size: i64) -> Self {
        self.default_page_size = page_size;
        self
    }
}

/// Everything one request needs: the services plus the caller's identity.
/// Built once per inbound request, never carried over to another.
#[derive(Clone)]
pub struct RequestContext {
    services: Services,
    user: Option<User>,
}

impl RequestContext {
    /// Resolves the caller from the bearer credential.
    pub async fn resolve(services: &Services, credential: Option<&str>) -> CoreResult<Self> {
        let user = services.identity.resolve(credential).await?;
        match &user {
            Some(user) => tracing::debug!("Request authenticated as {}", user.id),
            None => tracing::debug!("Anonymous request"),
        }
        Ok(Self {
            services: services.clone(),
            user,
        })
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> CoreResult<&User> {
        self.user.as_ref().ok_or(CoreError::Unauthenticated)
    }
}
