//! Application state - dependency injection container.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Service container; handlers go through this for all business logic
    pub services: Arc<dyn ServiceContainer>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build state from a live database connection and config.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let services = Arc::new(Services::from_connection(database.get_connection(), config));
        Self { services, database }
    }

    /// Build state with an injected container (used by tests).
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self { services, database }
    }
}
