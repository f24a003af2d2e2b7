//! Shared in-memory fakes for service-level tests.
//!
//! These implement the repository traits over plain vectors so the
//! services can be exercised without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use agenda_manager::domain::{Event, User};
use agenda_manager::errors::{AppError, AppResult};
use agenda_manager::infra::{EventFilter, EventRepository, UnitOfWork, UserRepository};

/// In-memory user repository
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(Vec::new()),
        })
    }

    /// Seed a user directly
    pub fn add(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// Flip a stored user's active flag
    pub fn set_active(&self, id: Uuid, active: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email.as_str() == email))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(ids
            .iter()
            .filter(|id| !id.is_nil())
            .filter_map(|id| users.iter().find(|u| u.id == *id).cloned())
            .collect())
    }

    async fn list_active(&self) -> AppResult<Vec<User>> {
        let mut active: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        self.users.lock().unwrap().push(user.clone());
        Ok(user.clone())
    }
}

/// In-memory event repository
pub struct InMemoryEvents {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    /// Seed an event directly
    pub fn add(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_filtered(&self, user_id: Uuid, filter: &EventFilter) -> AppResult<Vec<Event>> {
        let events = self.events.lock().unwrap();
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut visible: Vec<Event> = events
            .iter()
            .filter(|e| e.creator_id == user_id || e.has_participant(user_id))
            .filter(|e| filter.include_inactive || e.is_active)
            .filter(|e| filter.start.map_or(true, |start| e.date >= start))
            .filter(|e| filter.end.map_or(true, |end| e.date < end))
            .filter(|e| match &search {
                Some(term) => {
                    e.name.as_str().to_lowercase().contains(term)
                        || e.description.as_str().to_lowercase().contains(term)
                        || e.location.as_str().to_lowercase().contains(term)
                }
                None => true,
            })
            .cloned()
            .collect();

        visible.sort_by_key(|e| e.date);
        Ok(visible)
    }

    async fn insert(&self, event: &Event) -> AppResult<Event> {
        self.events.lock().unwrap().push(event.clone());
        Ok(event.clone())
    }

    async fn update(&self, event: &Event) -> AppResult<Event> {
        let mut events = self.events.lock().unwrap();
        let stored = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(AppError::NotFound)?;
        *stored = event.clone();
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Unit of work over the in-memory repositories
pub struct TestUnitOfWork {
    pub users: Arc<InMemoryUsers>,
    pub events: Arc<InMemoryEvents>,
}

impl TestUnitOfWork {
    pub fn new(users: Arc<InMemoryUsers>, events: Arc<InMemoryEvents>) -> Self {
        Self { users, events }
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn events(&self) -> Arc<dyn EventRepository> {
        self.events.clone()
    }
}

/// A user seeded straight into the store
pub fn seeded_user(name: &str, email: &str) -> User {
    User::create(name, email, "hashed-password").unwrap()
}

/// A date comfortably in the future
pub fn future_date() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}
