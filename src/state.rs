//! Application state shared with the router.

use std::sync::Arc;

use crate::config::Config;
use crate::middleware::RequestLogger;

/// Built once at startup from the loaded [`Config`] and cloned into the router.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub access_log: RequestLogger,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let access_log = RequestLogger::from_config(&config);
        Self {
            config: Arc::new(config),
            access_log,
        }
    }

    /// Replaces the access logger, e.g. to capture lines in tests.
    pub fn with_access_log(mut self, access_log: RequestLogger) -> Self {
        self.access_log = access_log;
        self
    }

    pub fn debug_mode(&self) -> bool {
        self.config.mode.is_debug()
    }
}
