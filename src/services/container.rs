//! Service Container - Centralized service access.
//!
//! Wires the repository, validator and clock into the services once at
//! startup so handlers depend only on service traits.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use sea_orm::DatabaseConnection;

use super::{UserManager, UserService};
use crate::config::Config;
use crate::domain::UserValidator;
use crate::infra::UserStore;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container from an already-built service
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self { user_service }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, config: &Config) -> Self {
        Self::with_clock(db, config, Arc::new(DefaultClock))
    }

    /// Same as `from_connection` with an explicit clock
    pub fn with_clock(db: DatabaseConnection, config: &Config, clock: Arc<dyn Clock>) -> Self {
        let repo = Arc::new(UserStore::new(db));
        let validator = UserValidator::with_max_age(config.max_age_years);
        let user_service = Arc::new(UserManager::new(repo, validator, clock));

        Self { user_service }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
