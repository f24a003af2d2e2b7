//! Event domain entity and related types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{EVENT_TYPE_EXCLUSIVE, EVENT_TYPE_SHARED, PAST_DATE_TOLERANCE_SECONDS};
use crate::domain::user::User;
use crate::domain::values::{EventDescription, EventName, Location};
use crate::errors::{AppError, AppResult};

/// Event type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Private event, visible and editable only by its creator
    Exclusive,
    /// Event visible to creator and explicitly added participants
    Shared,
}

impl EventType {
    pub fn is_shared(&self) -> bool {
        matches!(self, EventType::Shared)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            EVENT_TYPE_SHARED => EventType::Shared,
            _ => EventType::Exclusive,
        }
    }
}

impl From<EventType> for String {
    fn from(kind: EventType) -> Self {
        match kind {
            EventType::Exclusive => EVENT_TYPE_EXCLUSIVE.to_string(),
            EventType::Shared => EVENT_TYPE_SHARED.to_string(),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Exclusive => write!(f, "{}", EVENT_TYPE_EXCLUSIVE),
            EventType::Shared => write!(f, "{}", EVENT_TYPE_SHARED),
        }
    }
}

/// Event domain entity.
///
/// `creator` and `participants` are populated when the event is loaded
/// through the repository; a freshly created event carries no creator row.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub name: EventName,
    pub description: EventDescription,
    pub date: DateTime<Utc>,
    pub location: Location,
    pub kind: EventType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub creator_id: Uuid,
    pub creator: Option<User>,
    pub participants: Vec<User>,
}

impl Event {
    /// Create a new event. New events start active with no participants.
    pub fn create(
        name: &str,
        description: &str,
        date: DateTime<Utc>,
        location: &str,
        kind: EventType,
        creator_id: Uuid,
    ) -> AppResult<Self> {
        Self::validate_date(date)?;
        Self::validate_creator_id(creator_id)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: EventName::new(name)?,
            description: EventDescription::new(description)?,
            date,
            location: Location::new(location)?,
            kind,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            creator_id,
            creator: None,
            participants: Vec::new(),
        })
    }

    /// Update all mutable fields and stamp `updated_at`
    pub fn update(
        &mut self,
        name: &str,
        description: &str,
        date: DateTime<Utc>,
        location: &str,
        kind: EventType,
    ) -> AppResult<()> {
        Self::validate_date(date)?;

        self.name = EventName::new(name)?;
        self.description = EventDescription::new(description)?;
        self.date = date;
        self.location = Location::new(location)?;
        self.kind = kind;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Add a participant. Duplicates are ignored.
    pub fn add_participant(&mut self, participant: User) {
        if !self.has_participant(participant.id) {
            self.participants.push(participant);
        }
    }

    /// Remove a participant by user id
    pub fn remove_participant(&mut self, user_id: Uuid) {
        self.participants.retain(|p| p.id != user_id);
    }

    /// Replace the participant set with the given users
    pub fn set_participants(&mut self, participants: Vec<User>) {
        self.participants.clear();
        for participant in participants {
            self.add_participant(participant);
        }
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Some(Utc::now());
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Some(Utc::now());
    }

    /// Whether the user may see this event: the creator always can,
    /// participants can when the event is shared.
    pub fn can_user_view(&self, user_id: Uuid) -> bool {
        if self.creator_id == user_id {
            return true;
        }

        if self.kind.is_shared() {
            return self.has_participant(user_id);
        }

        false
    }

    /// Whether the user may modify this event: only the creator.
    pub fn can_user_edit(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }

    fn validate_date(date: DateTime<Utc>) -> AppResult<()> {
        if date < Utc::now() - Duration::seconds(PAST_DATE_TOLERANCE_SECONDS) {
            return Err(AppError::validation("Event date cannot be in the past"));
        }
        Ok(())
    }

    fn validate_creator_id(creator_id: Uuid) -> AppResult<()> {
        if creator_id.is_nil() {
            return Err(AppError::validation("Creator ID cannot be empty"));
        }
        Ok(())
    }
}

/// Participant entry in an event response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for ParticipantResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_string(),
        }
    }
}

/// Event response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    #[schema(example = "Team standup")]
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub event_type: EventType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub creator_id: Uuid,
    /// Display name of the creator (empty when the creator row is not loaded)
    pub creator_name: String,
    pub participants: Vec<ParticipantResponse>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name.into_string(),
            description: event.description.into_string(),
            date: event.date,
            location: event.location.into_string(),
            event_type: event.kind,
            is_active: event.is_active,
            created_at: event.created_at,
            updated_at: event.updated_at,
            creator_id: event.creator_id,
            creator_name: event.creator.map(|c| c.name).unwrap_or_default(),
            participants: event
                .participants
                .into_iter()
                .map(ParticipantResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(name: &str, email: &str) -> User {
        User::create(name, email, "hash").unwrap()
    }

    fn future_date() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[test]
    fn test_create_exclusive_event_has_no_participants() {
        let creator_id = Uuid::new_v4();
        let event = Event::create(
            "Test Event",
            "Test Description",
            future_date(),
            "Test Location",
            EventType::Exclusive,
            creator_id,
        )
        .unwrap();

        assert_eq!(event.creator_id, creator_id);
        assert_eq!(event.kind, EventType::Exclusive);
        assert!(event.participants.is_empty());
        assert!(event.is_active);
        assert!(event.updated_at.is_none());
    }

    #[test]
    fn test_create_past_date_fails() {
        let past = Utc::now() - Duration::days(1);
        let result = Event::create(
            "Test",
            "Description",
            past,
            "Location",
            EventType::Exclusive,
            Uuid::new_v4(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_within_tolerance_succeeds() {
        // 30 seconds in the past is inside the one-minute tolerance
        let just_passed = Utc::now() - Duration::seconds(30);
        let result = Event::create(
            "Test",
            "Description",
            just_passed,
            "Location",
            EventType::Exclusive,
            Uuid::new_v4(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_nil_creator_fails() {
        let result = Event::create(
            "Test",
            "Description",
            future_date(),
            "Location",
            EventType::Exclusive,
            Uuid::nil(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_replaces_fields_and_stamps_updated_at() {
        let mut event = Event::create(
            "Original Name",
            "Original Description",
            future_date(),
            "Original Location",
            EventType::Exclusive,
            Uuid::new_v4(),
        )
        .unwrap();

        let new_date = Utc::now() + Duration::days(2);
        event
            .update(
                "Updated Name",
                "Updated Description",
                new_date,
                "Updated Location",
                EventType::Shared,
            )
            .unwrap();

        assert_eq!(event.name.as_str(), "Updated Name");
        assert_eq!(event.description.as_str(), "Updated Description");
        assert_eq!(event.date, new_date);
        assert_eq!(event.kind, EventType::Shared);
        assert!(event.updated_at.is_some());
    }

    #[test]
    fn test_add_participant_is_idempotent() {
        let mut event = Event::create(
            "Shared Event",
            "",
            future_date(),
            "",
            EventType::Shared,
            Uuid::new_v4(),
        )
        .unwrap();

        let participant = test_user("Participant", "participant@test.com");
        event.add_participant(participant.clone());
        event.add_participant(participant.clone());

        assert_eq!(event.participants.len(), 1);
        assert!(event.has_participant(participant.id));
    }

    #[test]
    fn test_remove_participant() {
        let mut event = Event::create(
            "Shared Event",
            "",
            future_date(),
            "",
            EventType::Shared,
            Uuid::new_v4(),
        )
        .unwrap();

        let participant = test_user("Participant", "participant@test.com");
        event.add_participant(participant.clone());
        event.remove_participant(participant.id);

        assert!(event.participants.is_empty());
    }

    #[test]
    fn test_set_participants_replaces_existing() {
        let mut event = Event::create(
            "Shared Event",
            "",
            future_date(),
            "",
            EventType::Shared,
            Uuid::new_v4(),
        )
        .unwrap();

        event.add_participant(test_user("Old", "old@test.com"));

        let new_a = test_user("New A", "a@test.com");
        let new_b = test_user("New B", "b@test.com");
        event.set_participants(vec![new_a.clone(), new_b.clone()]);

        assert_eq!(event.participants.len(), 2);
        assert!(event.has_participant(new_a.id));
        assert!(event.has_participant(new_b.id));

        // An empty list clears everything (shared -> exclusive transition)
        event.set_participants(Vec::new());
        assert!(event.participants.is_empty());
    }

    #[test]
    fn test_creator_can_view_and_edit() {
        let creator_id = Uuid::new_v4();
        let event = Event::create(
            "Event",
            "",
            future_date(),
            "",
            EventType::Exclusive,
            creator_id,
        )
        .unwrap();

        assert!(event.can_user_view(creator_id));
        assert!(event.can_user_edit(creator_id));
    }

    #[test]
    fn test_participant_can_view_shared_but_not_edit() {
        let mut event = Event::create(
            "Shared Event",
            "",
            future_date(),
            "",
            EventType::Shared,
            Uuid::new_v4(),
        )
        .unwrap();

        let participant = test_user("Participant", "participant@test.com");
        event.add_participant(participant.clone());

        assert!(event.can_user_view(participant.id));
        assert!(!event.can_user_edit(participant.id));
    }

    #[test]
    fn test_stranger_cannot_view_exclusive_event() {
        let event = Event::create(
            "Private",
            "",
            future_date(),
            "",
            EventType::Exclusive,
            Uuid::new_v4(),
        )
        .unwrap();

        assert!(!event.can_user_view(Uuid::new_v4()));
    }

    #[test]
    fn test_edit_implies_view() {
        let creator_id = Uuid::new_v4();
        let mut event = Event::create(
            "Shared Event",
            "",
            future_date(),
            "",
            EventType::Shared,
            creator_id,
        )
        .unwrap();
        event.add_participant(test_user("Participant", "participant@test.com"));

        let mut user_ids: Vec<Uuid> = event.participants.iter().map(|p| p.id).collect();
        user_ids.push(creator_id);
        user_ids.push(Uuid::new_v4());

        for uid in user_ids {
            if event.can_user_edit(uid) {
                assert!(event.can_user_view(uid));
            }
        }
    }

    #[test]
    fn test_activate_deactivate_stamps_updated_at() {
        let mut event = Event::create(
            "Event",
            "",
            future_date(),
            "",
            EventType::Exclusive,
            Uuid::new_v4(),
        )
        .unwrap();

        event.deactivate();
        assert!(!event.is_active);
        assert!(event.updated_at.is_some());

        event.activate();
        assert!(event.is_active);
    }

    #[test]
    fn test_event_type_roundtrip() {
        assert_eq!(EventType::from("shared"), EventType::Shared);
        assert_eq!(EventType::from("exclusive"), EventType::Exclusive);
        assert_eq!(EventType::Shared.to_string(), "shared");
        assert_eq!(String::from(EventType::Exclusive), "exclusive");
    }
}
