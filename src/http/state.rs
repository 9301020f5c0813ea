//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::ScheduleRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn ScheduleRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn ScheduleRepository>) -> Self {
        Self { repository }
    }
}
