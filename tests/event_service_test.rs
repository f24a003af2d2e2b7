//! Event service tests over in-memory repositories.

mod common;

use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use agenda_manager::domain::{EventType, User};
use agenda_manager::errors::AppError;
use agenda_manager::services::{DashboardQuery, EventData, EventManager, EventService};

use common::{future_date, seeded_user, InMemoryEvents, InMemoryUsers, TestUnitOfWork};

fn service(
    users: Arc<InMemoryUsers>,
    events: Arc<InMemoryEvents>,
) -> EventManager<TestUnitOfWork> {
    EventManager::new(Arc::new(TestUnitOfWork::new(users, events)))
}

fn event_data(name: &str, kind: EventType, participant_ids: Vec<Uuid>) -> EventData {
    EventData {
        name: name.to_string(),
        description: "Description".to_string(),
        date: future_date(),
        location: "Office".to_string(),
        kind,
        participant_ids,
    }
}

/// Users store seeded with a creator and one other active user
fn seeded_people() -> (Arc<InMemoryUsers>, User, User) {
    let users = InMemoryUsers::new();
    let creator = seeded_user("Creator", "creator@test.com");
    let other = seeded_user("Participant", "participant@test.com");
    users.add(creator.clone());
    users.add(other.clone());
    (users, creator, other)
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_event_unknown_creator_fails() {
    let service = service(InMemoryUsers::new(), InMemoryEvents::new());

    let result = service
        .create_event(Uuid::new_v4(), event_data("Event", EventType::Exclusive, vec![]))
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_create_event_inactive_creator_fails() {
    let (users, creator, _) = seeded_people();
    users.set_active(creator.id, false);
    let service = service(users, InMemoryEvents::new());

    let result = service
        .create_event(creator.id, event_data("Event", EventType::Exclusive, vec![]))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_create_shared_event_attaches_participants() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![other.id]),
        )
        .await
        .unwrap();

    assert_eq!(event.event_type, EventType::Shared);
    assert_eq!(event.participants.len(), 1);
    assert_eq!(event.participants[0].id, other.id);
    assert!(event.is_active);
}

#[tokio::test]
async fn test_create_exclusive_event_ignores_participant_ids() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(
            creator.id,
            event_data("Private", EventType::Exclusive, vec![other.id]),
        )
        .await
        .unwrap();

    assert!(event.participants.is_empty());
}

#[tokio::test]
async fn test_create_shared_event_unknown_participant_fails() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let result = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![Uuid::new_v4()]),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_create_shared_event_inactive_participant_fails() {
    let (users, creator, other) = seeded_people();
    users.set_active(other.id, false);
    let service = service(users, InMemoryEvents::new());

    let result = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![other.id]),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

// =============================================================================
// View / Update / Delete authorization
// =============================================================================

#[tokio::test]
async fn test_participant_can_view_but_not_edit() {
    let (users, creator, participant) = seeded_people();
    let events = InMemoryEvents::new();
    let service = service(users, events);

    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![participant.id]),
        )
        .await
        .unwrap();

    // Participant sees the event
    let viewed = service.get_event(event.id, participant.id).await.unwrap();
    assert_eq!(viewed.id, event.id);

    // But cannot edit it
    let result = service
        .update_event(
            event.id,
            participant.id,
            event_data("Hijacked", EventType::Shared, vec![]),
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    // Nor delete it
    let result = service.delete_event(event.id, participant.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_stranger_cannot_view_exclusive_event() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Private", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    let result = service.get_event(event.id, other.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_get_missing_event_is_not_found() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let result = service.get_event(Uuid::new_v4(), creator.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_update_shared_to_exclusive_clears_participants() {
    let (users, creator, participant) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![participant.id]),
        )
        .await
        .unwrap();

    let updated = service
        .update_event(
            event.id,
            creator.id,
            event_data("Planning", EventType::Exclusive, vec![participant.id]),
        )
        .await
        .unwrap();

    assert_eq!(updated.event_type, EventType::Exclusive);
    assert!(updated.participants.is_empty());
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn test_update_exclusive_to_shared_sets_exact_list() {
    let (users, creator, participant) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Private", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    let updated = service
        .update_event(
            event.id,
            creator.id,
            event_data("Now shared", EventType::Shared, vec![participant.id]),
        )
        .await
        .unwrap();

    assert_eq!(updated.event_type, EventType::Shared);
    assert_eq!(updated.participants.len(), 1);
    assert_eq!(updated.participants[0].id, participant.id);
}

#[tokio::test]
async fn test_delete_event_removes_it() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Gone soon", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    service.delete_event(event.id, creator.id).await.unwrap();

    let result = service.get_event(event.id, creator.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

// =============================================================================
// Activate / Deactivate
// =============================================================================

#[tokio::test]
async fn test_deactivate_and_activate_flip_the_flag() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Toggle", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    service.deactivate_event(event.id, creator.id).await.unwrap();
    let fetched = service.get_event(event.id, creator.id).await.unwrap();
    assert!(!fetched.is_active);

    service.activate_event(event.id, creator.id).await.unwrap();
    let fetched = service.get_event(event.id, creator.id).await.unwrap();
    assert!(fetched.is_active);
}

#[tokio::test]
async fn test_deactivate_requires_creator() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Toggle", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    let result = service.deactivate_event(event.id, other.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

// =============================================================================
// Participant management
// =============================================================================

#[tokio::test]
async fn test_add_participant_to_exclusive_event_fails() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Private", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    let result = service.add_participant(event.id, other.id, creator.id).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_add_participant_requires_creator() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Planning", EventType::Shared, vec![]))
        .await
        .unwrap();

    let result = service.add_participant(event.id, other.id, other.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_add_duplicate_participant_conflicts() {
    let (users, creator, other) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![other.id]),
        )
        .await
        .unwrap();

    let result = service.add_participant(event.id, other.id, creator.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_add_inactive_participant_fails() {
    let (users, creator, other) = seeded_people();
    let service = service(users.clone(), InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Planning", EventType::Shared, vec![]))
        .await
        .unwrap();

    users.set_active(other.id, false);

    let result = service.add_participant(event.id, other.id, creator.id).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_add_unknown_participant_is_not_found() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Planning", EventType::Shared, vec![]))
        .await
        .unwrap();

    let result = service
        .add_participant(event.id, Uuid::new_v4(), creator.id)
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_available_participants_excludes_creator_and_existing() {
    let users = InMemoryUsers::new();
    let creator = seeded_user("Creator", "creator@test.com");
    let existing = seeded_user("Existing", "existing@test.com");
    let candidate = seeded_user("Candidate", "candidate@test.com");
    users.add(creator.clone());
    users.add(existing.clone());
    users.add(candidate.clone());

    let service = service(users, InMemoryEvents::new());
    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![existing.id]),
        )
        .await
        .unwrap();

    let available = service
        .available_participants(event.id, creator.id)
        .await
        .unwrap();

    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, candidate.id);
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_inactive_user_fails() {
    let (users, creator, _) = seeded_people();
    users.set_active(creator.id, false);
    let service = service(users, InMemoryEvents::new());

    let result = service
        .dashboard(creator.id, DashboardQuery::default())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_dashboard_invalid_range_fails() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let query = DashboardQuery {
        start_date: Some(Utc::now() + Duration::days(10)),
        end_date: Some(Utc::now() + Duration::days(2)),
        ..Default::default()
    };

    let result = service.dashboard(creator.id, query).await;
    assert!(matches!(result, Err(AppError::InvalidDateRange(_))));
}

#[tokio::test]
async fn test_shared_event_appears_in_both_dashboards() {
    let (users, creator, participant) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![participant.id]),
        )
        .await
        .unwrap();

    let creator_events = service
        .dashboard(creator.id, DashboardQuery::default())
        .await
        .unwrap();
    let participant_events = service
        .dashboard(participant.id, DashboardQuery::default())
        .await
        .unwrap();

    assert!(creator_events.iter().any(|e| e.id == event.id));
    assert!(participant_events.iter().any(|e| e.id == event.id));
}

#[tokio::test]
async fn test_removed_participant_loses_dashboard_visibility() {
    let (users, creator, participant) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(
            creator.id,
            event_data("Planning", EventType::Shared, vec![participant.id]),
        )
        .await
        .unwrap();

    service
        .remove_participant(event.id, participant.id, creator.id)
        .await
        .unwrap();

    let participant_events = service
        .dashboard(participant.id, DashboardQuery::default())
        .await
        .unwrap();
    let creator_events = service
        .dashboard(creator.id, DashboardQuery::default())
        .await
        .unwrap();

    assert!(!participant_events.iter().any(|e| e.id == event.id));
    assert!(creator_events.iter().any(|e| e.id == event.id));
}

#[tokio::test]
async fn test_dashboard_search_matches_name() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    service
        .create_event(creator.id, event_data("Board meeting", EventType::Exclusive, vec![]))
        .await
        .unwrap();
    service
        .create_event(creator.id, event_data("Conference", EventType::Exclusive, vec![]))
        .await
        .unwrap();

    let query = DashboardQuery {
        search_text: Some("meeting".to_string()),
        ..Default::default()
    };

    let events = service.dashboard(creator.id, query).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Board meeting");
}

#[tokio::test]
async fn test_dashboard_includes_inactive_events() {
    let (users, creator, _) = seeded_people();
    let service = service(users, InMemoryEvents::new());

    let event = service
        .create_event(creator.id, event_data("Paused", EventType::Exclusive, vec![]))
        .await
        .unwrap();
    service.deactivate_event(event.id, creator.id).await.unwrap();

    let events = service
        .dashboard(creator.id, DashboardQuery::default())
        .await
        .unwrap();

    assert!(events.iter().any(|e| e.id == event.id && !e.is_active));
}
