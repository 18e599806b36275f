//! Edge server state.

use std::path::Path;
use std::sync::Arc;

use crate::config::EdgeConfig;

/// Shared state for edge handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: EdgeConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EdgeConfig {
        &self.inner.config
    }

    /// Directory of built pages served behind the guard.
    #[must_use]
    pub fn static_dir(&self) -> &Path {
        &self.inner.config.static_dir
    }
}
