use std::time::Duration;

use launchpad_core::Services;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
