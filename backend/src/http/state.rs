//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::ScheduleLifecycleManager;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for health checks
    pub repository: Arc<dyn FullRepository>,
    /// Schedule orchestration over the same repository
    pub schedules: Arc<ScheduleLifecycleManager>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        let schedules = Arc::new(ScheduleLifecycleManager::new(Arc::clone(&repository)));
        Self {
            repository,
            schedules,
        }
    }
}
