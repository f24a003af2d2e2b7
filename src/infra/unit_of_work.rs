//! Unit of Work - centralized repository access.
//!
//! Every use case in this system performs a single repository save per
//! request, so the unit of work only needs to hand out repositories
//! over a shared connection; there is no multi-step transaction API.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{EventRepository, EventStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get event repository
    fn events(&self) -> Arc<dyn EventRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    event_repo: Arc<EventStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let event_repo = Arc::new(EventStore::new(db));
        Self {
            user_repo,
            event_repo,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn events(&self) -> Arc<dyn EventRepository> {
        self.event_repo.clone()
    }
}
