use std::sync::Arc;

use service::ConsoleService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub console: Arc<ConsoleService>,
    /// Cap applied to `GET /api/logs` when the request has no `limit`.
    pub default_log_limit: Option<usize>,
}

impl AppState {
    pub fn new(console: ConsoleService) -> Self {
        Self { console: Arc::new(console), default_log_limit: None }
    }

    pub fn with_default_log_limit(mut self, limit: Option<usize>) -> Self {
        self.default_log_limit = limit;
        self
    }
}
