//! String value objects with validation and normalization.
//!
//! Each constructor trims its input and enforces the length/format
//! rules of the field it represents. Values loaded back from storage
//! bypass validation via `from_stored`, since they were validated on
//! the way in.

use crate::config::{
    MAX_EMAIL_LENGTH, MAX_EVENT_DESCRIPTION_LENGTH, MAX_EVENT_LOCATION_LENGTH,
    MAX_EVENT_NAME_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Email address, lowercase-normalized.
///
/// Invariant: non-blank, contains '@' and '.', at most 150 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Email cannot be empty"));
        }
        if !trimmed.contains('@') || !trimmed.contains('.') {
            return Err(AppError::validation("Invalid email format"));
        }
        if trimmed.len() > MAX_EMAIL_LENGTH {
            return Err(AppError::validation(format!(
                "Email cannot be longer than {} characters",
                MAX_EMAIL_LENGTH
            )));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event name.
///
/// Invariant: non-blank after trimming, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventName(String);

impl EventName {
    pub fn new(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Event name cannot be empty"));
        }
        if trimmed.len() > MAX_EVENT_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Event name cannot be longer than {} characters",
                MAX_EVENT_NAME_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional event description. Blank input yields the empty description.
///
/// Invariant: at most 1000 characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDescription(String);

impl EventDescription {
    pub fn new(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self(String::new()));
        }
        if trimmed.len() > MAX_EVENT_DESCRIPTION_LENGTH {
            return Err(AppError::validation(format!(
                "Event description cannot be longer than {} characters",
                MAX_EVENT_DESCRIPTION_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for EventDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional event location. Blank input yields the empty location.
///
/// Invariant: at most 300 characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    pub fn new(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self(String::new()));
        }
        if trimmed.len() > MAX_EVENT_LOCATION_LENGTH {
            return Err(AppError::validation(format!(
                "Location cannot be longer than {} characters",
                MAX_EVENT_LOCATION_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
