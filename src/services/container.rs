//! Service Container - Centralized service construction and access.

use std::sync::Arc;

use super::{AuthService, EventService, UserService};
use crate::config::Config;
use crate::infra::Persistence;

/// Concrete service container holding all application services
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    event_service: Arc<dyn EventService>,
}

impl Services {
    /// Create a new service container with pre-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        event_service: Arc<dyn EventService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            event_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, EventManager, UserManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let event_service = Arc::new(EventManager::new(uow));

        Self {
            auth_service,
            user_service,
            event_service,
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get user service
    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    /// Get event service
    pub fn events(&self) -> Arc<dyn EventService> {
        self.event_service.clone()
    }
}
