//! Event repository implementation.
//!
//! Events are aggregates: loading one hydrates its creator and
//! participant users, and writing one keeps the participant join
//! rows in sync with the entity's participant set.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::event::{self, Entity as EventEntity};
use super::entities::{event_participant, user};
use crate::domain::{
    values::{EventDescription, EventName, Location},
    Event, EventType, User,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Filter for dashboard event queries.
///
/// The date window is half-open: an event matches when
/// `start <= date < end` for whichever bounds are present.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

/// Event repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find event by ID with creator and participants loaded
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    /// Find events visible to the user (created or participated),
    /// narrowed by the filter, ordered by date ascending
    async fn find_filtered(&self, user_id: Uuid, filter: &EventFilter) -> AppResult<Vec<Event>>;

    /// Persist a new event together with its participant set
    async fn insert(&self, event: &Event) -> AppResult<Event>;

    /// Update an event and replace its participant set
    async fn update(&self, event: &Event) -> AppResult<Event>;

    /// Delete an event and its participant join rows
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EventRepository over SeaORM
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load creators and participants for a batch of event rows and
    /// assemble domain entities.
    async fn hydrate(&self, models: Vec<event::Model>) -> AppResult<Vec<Event>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let links = event_participant::Entity::find()
            .filter(event_participant::Column::EventId.is_in(event_ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut user_ids: HashSet<Uuid> = models.iter().map(|m| m.creator_id).collect();
        user_ids.extend(links.iter().map(|l| l.user_id));

        let users: HashMap<Uuid, User> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids.into_iter().collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        let mut participants_by_event: HashMap<Uuid, Vec<User>> = HashMap::new();
        for link in links {
            if let Some(participant) = users.get(&link.user_id) {
                participants_by_event
                    .entry(link.event_id)
                    .or_default()
                    .push(participant.clone());
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let creator = users.get(&model.creator_id).cloned();
                let participants = participants_by_event.remove(&model.id).unwrap_or_default();
                assemble(model, creator, participants)
            })
            .collect())
    }

    /// Replace the participant join rows for an event
    async fn replace_participants(&self, event_id: Uuid, participants: &[User]) -> AppResult<()> {
        event_participant::Entity::delete_many()
            .filter(event_participant::Column::EventId.eq(event_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        let rows: Vec<event_participant::ActiveModel> = participants
            .iter()
            .map(|p| event_participant::ActiveModel {
                event_id: Set(event_id),
                user_id: Set(p.id),
            })
            .collect();

        if !rows.is_empty() {
            event_participant::Entity::insert_many(rows)
                .exec(&self.db)
                .await
                .map_err(AppError::from)?;
        }

        Ok(())
    }

    /// Reload a stored event; missing rows after a write are an internal fault
    async fn reload(&self, id: Uuid) -> AppResult<Event> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Failed to reload stored event"))
    }
}

#[async_trait]
impl EventRepository for EventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        let model = EventEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let Some(model) = model else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn find_filtered(&self, user_id: Uuid, filter: &EventFilter) -> AppResult<Vec<Event>> {
        // Events the user participates in, for the visibility scope
        let participating: Vec<Uuid> = event_participant::Entity::find()
            .filter(event_participant::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|l| l.event_id)
            .collect();

        let mut visibility = Condition::any().add(event::Column::CreatorId.eq(user_id));
        if !participating.is_empty() {
            visibility = visibility.add(event::Column::Id.is_in(participating));
        }

        let mut query = EventEntity::find().filter(visibility);

        if !filter.include_inactive {
            query = query.filter(event::Column::IsActive.eq(true));
        }
        if let Some(start) = filter.start {
            query = query.filter(event::Column::Date.gte(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(event::Column::Date.lt(end));
        }

        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            event::Entity,
                            event::Column::Name,
                        ))))
                        .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            event::Entity,
                            event::Column::Description,
                        ))))
                        .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            event::Entity,
                            event::Column::Location,
                        ))))
                        .like(pattern),
                    ),
            );
        }

        let models = query
            .order_by_asc(event::Column::Date)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        self.hydrate(models).await
    }

    async fn insert(&self, event: &Event) -> AppResult<Event> {
        let active_model = event::ActiveModel {
            id: Set(event.id),
            name: Set(event.name.as_str().to_string()),
            description: Set(event.description.as_str().to_string()),
            date: Set(event.date),
            location: Set(event.location.as_str().to_string()),
            event_type: Set(String::from(event.kind)),
            is_active: Set(event.is_active),
            created_at: Set(event.created_at),
            updated_at: Set(event.updated_at),
            creator_id: Set(event.creator_id),
        };

        active_model.insert(&self.db).await.map_err(AppError::from)?;
        self.replace_participants(event.id, &event.participants)
            .await?;

        self.reload(event.id).await
    }

    async fn update(&self, event: &Event) -> AppResult<Event> {
        let active_model = event::ActiveModel {
            id: Set(event.id),
            name: Set(event.name.as_str().to_string()),
            description: Set(event.description.as_str().to_string()),
            date: Set(event.date),
            location: Set(event.location.as_str().to_string()),
            event_type: Set(String::from(event.kind)),
            is_active: Set(event.is_active),
            created_at: Set(event.created_at),
            updated_at: Set(event.updated_at),
            creator_id: Set(event.creator_id),
        };

        active_model.update(&self.db).await.map_err(AppError::from)?;
        self.replace_participants(event.id, &event.participants)
            .await?;

        self.reload(event.id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // Join rows first, then the event row itself
        event_participant::Entity::delete_many()
            .filter(event_participant::Column::EventId.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        let result = EventEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Build a domain event from its row and hydrated relations.
///
/// Stored strings were validated on the way in and are restored
/// without re-validation.
fn assemble(model: event::Model, creator: Option<User>, participants: Vec<User>) -> Event {
    Event {
        id: model.id,
        name: EventName::from_stored(model.name),
        description: EventDescription::from_stored(model.description),
        date: model.date,
        location: Location::from_stored(model.location),
        kind: EventType::from(model.event_type.as_str()),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        creator_id: model.creator_id,
        creator,
        participants,
    }
}
