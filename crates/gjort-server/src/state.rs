use crate::config::ServerConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state. The pool and config are threaded through
/// here explicitly -- never globals -- so tests can build isolated
/// instances.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new app state
    pub fn new(pool: PgPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
