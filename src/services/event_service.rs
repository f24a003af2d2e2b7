//! Event service - Handles event use cases.
//!
//! Each operation is a straight-line sequence: existence checks, one
//! authorization check, one mutation, one persistence call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Event, EventResponse, EventType, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{EventFilter, UnitOfWork};
use crate::services::date_range::{resolve_range, DashboardQuery};

/// Input for creating or updating an event
#[derive(Debug, Clone)]
pub struct EventData {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub kind: EventType,
    /// Only honored for shared events; exclusive events never carry participants
    pub participant_ids: Vec<Uuid>,
}

/// Event service trait for dependency injection.
#[async_trait]
pub trait EventService: Send + Sync {
    /// Create an event on behalf of the creator
    async fn create_event(&self, creator_id: Uuid, data: EventData) -> AppResult<EventResponse>;

    /// Get a single event, enforcing view rights
    async fn get_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<EventResponse>;

    /// Update an event, enforcing edit rights
    async fn update_event(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        data: EventData,
    ) -> AppResult<EventResponse>;

    /// Delete an event, enforcing edit rights
    async fn delete_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Reactivate an event, enforcing edit rights
    async fn activate_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Deactivate an event, enforcing edit rights
    async fn deactivate_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// List the user's events filtered by date window, search text,
    /// or named period. Inactive events are included.
    async fn dashboard(
        &self,
        user_id: Uuid,
        query: DashboardQuery,
    ) -> AppResult<Vec<EventResponse>>;

    /// Add a participant to a shared event (creator only)
    async fn add_participant(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        requester: Uuid,
    ) -> AppResult<()>;

    /// Remove a participant from an event (creator only)
    async fn remove_participant(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        requester: Uuid,
    ) -> AppResult<()>;

    /// Active users who could still be added to the event (creator only)
    async fn available_participants(
        &self,
        event_id: Uuid,
        requester: Uuid,
    ) -> AppResult<Vec<UserResponse>>;
}

/// Concrete implementation of EventService using Unit of Work.
pub struct EventManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EventManager<U> {
    /// Create new event service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Resolve and validate the participant list for create/update.
    ///
    /// Participants are only attached to shared events; for exclusive
    /// events the ids are ignored. Every id must resolve to an existing,
    /// active user.
    async fn load_participants(&self, data: &EventData) -> AppResult<Vec<User>> {
        if !data.kind.is_shared() || data.participant_ids.is_empty() {
            return Ok(Vec::new());
        }

        let participants = self.uow.users().find_by_ids(&data.participant_ids).await?;

        let found: HashSet<Uuid> = participants.iter().map(|p| p.id).collect();
        let missing: Vec<String> = data
            .participant_ids
            .iter()
            .filter(|id| !id.is_nil() && !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Invalid participant IDs: {}",
                missing.join(", ")
            )));
        }

        if participants.iter().any(|p| !p.is_active) {
            return Err(AppError::validation("Some participants are not active"));
        }

        Ok(participants)
    }

    /// Fetch an event and require edit rights on it
    async fn editable_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<Event> {
        let event = self
            .uow
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !event.can_user_edit(user_id) {
            return Err(AppError::Forbidden);
        }

        Ok(event)
    }
}

#[async_trait]
impl<U: UnitOfWork> EventService for EventManager<U> {
    async fn create_event(&self, creator_id: Uuid, data: EventData) -> AppResult<EventResponse> {
        let creator = self
            .uow
            .users()
            .find_by_id(creator_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !creator.is_active {
            return Err(AppError::validation("Creator user is not active"));
        }

        let participants = self.load_participants(&data).await?;

        let mut event = Event::create(
            &data.name,
            &data.description,
            data.date,
            &data.location,
            data.kind,
            creator_id,
        )?;
        event.set_participants(participants);

        let stored = self.uow.events().insert(&event).await?;
        tracing::info!(event_id = %stored.id, creator = %creator_id, "Event created");

        Ok(EventResponse::from(stored))
    }

    async fn get_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<EventResponse> {
        let event = self
            .uow
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !event.can_user_view(user_id) {
            return Err(AppError::Forbidden);
        }

        Ok(EventResponse::from(event))
    }

    async fn update_event(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        data: EventData,
    ) -> AppResult<EventResponse> {
        let mut event = self.editable_event(event_id, user_id).await?;

        let participants = self.load_participants(&data).await?;

        event.update(
            &data.name,
            &data.description,
            data.date,
            &data.location,
            data.kind,
        )?;
        // Replaces the whole set: switching Shared -> Exclusive clears it
        event.set_participants(participants);

        let stored = self.uow.events().update(&event).await?;
        Ok(EventResponse::from(stored))
    }

    async fn delete_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.editable_event(event_id, user_id).await?;
        self.uow.events().delete(event_id).await?;

        tracing::info!(event_id = %event_id, "Event deleted");
        Ok(())
    }

    async fn activate_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut event = self.editable_event(event_id, user_id).await?;
        event.activate();
        self.uow.events().update(&event).await?;
        Ok(())
    }

    async fn deactivate_event(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut event = self.editable_event(event_id, user_id).await?;
        event.deactivate();
        self.uow.events().update(&event).await?;
        Ok(())
    }

    async fn dashboard(
        &self,
        user_id: Uuid,
        query: DashboardQuery,
    ) -> AppResult<Vec<EventResponse>> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.is_active {
            return Err(AppError::validation("User is not active"));
        }

        let window = resolve_range(&query, Utc::now())?;

        let filter = EventFilter {
            start: window.start,
            end: window.end,
            search: query.search_text,
            include_inactive: true,
        };

        let events = self.uow.events().find_filtered(user_id, &filter).await?;
        Ok(events.into_iter().map(EventResponse::from).collect())
    }

    async fn add_participant(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        requester: Uuid,
    ) -> AppResult<()> {
        let mut event = self
            .uow
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if event.creator_id != requester {
            return Err(AppError::Forbidden);
        }

        if !event.kind.is_shared() {
            return Err(AppError::validation(
                "Cannot add participants to exclusive events",
            ));
        }

        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.is_active {
            return Err(AppError::validation(
                "Cannot add inactive user as participant",
            ));
        }

        if event.has_participant(user.id) {
            return Err(AppError::conflict("Participant"));
        }

        event.add_participant(user);
        self.uow.events().update(&event).await?;
        Ok(())
    }

    async fn remove_participant(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        requester: Uuid,
    ) -> AppResult<()> {
        let mut event = self
            .uow
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if event.creator_id != requester {
            return Err(AppError::Forbidden);
        }

        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        event.remove_participant(user.id);
        self.uow.events().update(&event).await?;
        Ok(())
    }

    async fn available_participants(
        &self,
        event_id: Uuid,
        requester: Uuid,
    ) -> AppResult<Vec<UserResponse>> {
        let event = self
            .uow
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if event.creator_id != requester {
            return Err(AppError::Forbidden);
        }

        let existing: HashSet<Uuid> = event.participants.iter().map(|p| p.id).collect();
        let users = self.uow.users().list_active().await?;

        Ok(users
            .into_iter()
            .filter(|u| u.id != requester && !existing.contains(&u.id))
            .map(UserResponse::from)
            .collect())
    }
}
