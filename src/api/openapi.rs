//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, event_handler, user_handler};
use crate::domain::{EventResponse, EventType, ParticipantResponse, UserResponse};
use crate::services::{RegisteredUser, TokenResponse};
use crate::types::MessageResponse;

/// OpenAPI documentation for the Agenda Manager API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agenda Manager",
        version = "0.1.0",
        description = "Personal and shared calendar API with Axum, SeaORM, and clean architecture",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        // User endpoints
        user_handler::list_active_users,
        // Event endpoints
        event_handler::create_event,
        event_handler::dashboard,
        event_handler::get_event,
        event_handler::update_event,
        event_handler::delete_event,
        event_handler::activate_event,
        event_handler::deactivate_event,
        event_handler::add_participant,
        event_handler::remove_participant,
        event_handler::available_participants,
    ),
    components(
        schemas(
            // Domain types
            EventType,
            EventResponse,
            ParticipantResponse,
            UserResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            RegisteredUser,
            TokenResponse,
            // Event handler types
            event_handler::CreateEventRequest,
            event_handler::UpdateEventRequest,
            // Shared responses
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User queries"),
        (name = "Events", description = "Event management and dashboard")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
