//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work for centralized repository access.

mod auth_service;
pub mod container;
pub mod date_range;
mod event_service;
mod user_service;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, RegisteredUser, TokenResponse};
pub use date_range::{DashboardQuery, DateWindow};
pub use event_service::{EventData, EventManager, EventService};
pub use user_service::{UserManager, UserService};
