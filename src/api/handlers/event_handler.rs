//! Event handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{EventResponse, EventType, UserResponse};
use crate::errors::AppResult;
use crate::services::{DashboardQuery, EventData};
use crate::types::{MessageResponse, NoContent};

/// Event creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    /// Event name
    #[validate(length(min = 1, max = 200, message = "Event name must be 1-200 characters"))]
    #[schema(example = "Team standup")]
    pub name: String,
    /// Optional free-text description
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description cannot be longer than 1000 characters"))]
    pub description: String,
    /// Event date, must not be in the past
    pub date: DateTime<Utc>,
    /// Optional location
    #[serde(default)]
    #[validate(length(max = 300, message = "Location cannot be longer than 300 characters"))]
    #[schema(example = "Meeting room 4")]
    pub location: String,
    /// Exclusive (private) or shared
    pub event_type: EventType,
    /// Participant user ids; only honored for shared events
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}

/// Event update request, same shape as creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Event name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description cannot be longer than 1000 characters"))]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(max = 300, message = "Location cannot be longer than 300 characters"))]
    pub location: String,
    pub event_type: EventType,
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}

/// Dashboard filter query parameters.
///
/// Either a named period or explicit date/time bounds; a present
/// period wins over the explicit bounds.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardParams {
    /// Window start date (RFC 3339)
    pub start_date: Option<DateTime<Utc>>,
    /// Window end date (RFC 3339), inclusive of its whole day when no time is given
    pub end_date: Option<DateTime<Utc>>,
    /// Wall-clock start time "HH:MM[:SS]" applied to the start date
    pub start_time: Option<String>,
    /// Wall-clock end time "HH:MM[:SS]" applied to the end date
    pub end_time: Option<String>,
    /// Case-insensitive substring match on name, description, and location
    pub search_text: Option<String>,
    /// Named period: "today", "week", or "month"
    pub period_type: Option<String>,
}

impl From<DashboardParams> for DashboardQuery {
    fn from(params: DashboardParams) -> Self {
        Self {
            start_date: params.start_date,
            end_date: params.end_date,
            start_time: params.start_time,
            end_time: params.end_time,
            search_text: params.search_text,
            period_type: params.period_type,
        }
    }
}

impl From<CreateEventRequest> for EventData {
    fn from(request: CreateEventRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            date: request.date,
            location: request.location,
            kind: request.event_type,
            participant_ids: request.participant_ids,
        }
    }
}

impl From<UpdateEventRequest> for EventData {
    fn from(request: UpdateEventRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            date: request.date,
            location: request.location,
            kind: request.event_type,
            participant_ids: request.participant_ids,
        }
    }
}

/// Create event routes
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_event))
        .route("/dashboard", get(dashboard))
        .route(
            "/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/:id/activate", patch(activate_event))
        .route("/:id/deactivate", patch(deactivate_event))
        .route(
            "/:id/participants/available",
            get(available_participants),
        )
        .route(
            "/:id/participants/:user_id",
            post(add_participant).delete(remove_participant),
        )
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    let event = state
        .event_service
        .create_event(current_user.id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// List dashboard events filtered by date range, search text, or period
#[utoipa::path(
    get,
    path = "/api/v1/events/dashboard",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(DashboardParams),
    responses(
        (status = 200, description = "Events visible to the user", body = Vec<EventResponse>),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dashboard(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = state
        .event_service
        .dashboard(current_user.id, params.into())
        .await?;

    Ok(Json(events))
}

/// Get a single event
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event detail", body = EventResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - User cannot view this event"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = state.event_service.get_event(id, current_user.id).await?;
    Ok(Json(event))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator can edit"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    let event = state
        .event_service
        .update_event(id, current_user.id, payload.into())
        .await?;

    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator can delete"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.event_service.delete_event(id, current_user.id).await?;
    Ok(NoContent)
}

/// Reactivate an event
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}/activate",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event activated", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator can edit"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn activate_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state
        .event_service
        .activate_event(id, current_user.id)
        .await?;

    Ok(Json(MessageResponse::new("Event activated")))
}

/// Deactivate an event
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}/deactivate",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deactivated", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator can edit"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn deactivate_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state
        .event_service
        .deactivate_event(id, current_user.id)
        .await?;

    Ok(Json(MessageResponse::new("Event deactivated")))
}

/// Add a participant to a shared event
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/participants/{user_id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User to add")
    ),
    responses(
        (status = 200, description = "Participant added", body = MessageResponse),
        (status = 400, description = "Exclusive event or inactive user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator manages participants"),
        (status = 404, description = "Event or user not found"),
        (status = 409, description = "Already a participant")
    )
)]
pub async fn add_participant(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .event_service
        .add_participant(id, user_id, current_user.id)
        .await?;

    Ok(Json(MessageResponse::new("Participant added")))
}

/// Remove a participant from an event
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/participants/{user_id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User to remove")
    ),
    responses(
        (status = 200, description = "Participant removed", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator manages participants"),
        (status = 404, description = "Event or user not found")
    )
)]
pub async fn remove_participant(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .event_service
        .remove_participant(id, user_id, current_user.id)
        .await?;

    Ok(Json(MessageResponse::new("Participant removed")))
}

/// Active users who can still be added to the event
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/participants/available",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Users available as participants", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the creator manages participants"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn available_participants(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .event_service
        .available_participants(id, current_user.id)
        .await?;

    Ok(Json(users))
}
