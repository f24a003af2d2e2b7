//! Authentication service - Handles user registration and login.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service orchestrates repository access and JWT issuance.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{values::Email, Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Registration outcome
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    /// Identifier of the newly created user
    pub user_id: Uuid,
    /// Normalized email the account was registered under
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// Profile of the authenticated user
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, name: String, email: String, password: String)
        -> AppResult<RegisteredUser>;

    /// Login and return JWT token with the user profile
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// End a session. JWT auth is stateless, so this only exists to
    /// give clients a uniform sign-out call.
    async fn logout(&self) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.as_str().to_string(),
        name: user.name.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserResponse::from(user.clone()),
    })
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<RegisteredUser> {
        // Normalize before the uniqueness check so "A@x.com" and "a@x.com"
        // are the same account
        let email = Email::new(&email)?;
        if self.uow.users().exists_by_email(email.as_str()).await? {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = User::create(&name, email.as_str(), &password_hash)?;
        let stored = self.uow.users().create(&user).await?;

        tracing::info!(user_id = %stored.id, "User registered");

        Ok(RegisteredUser {
            user_id: stored.id,
            email: stored.email.into_string(),
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = Email::new(&email)?;
        let user_result = self.uow.users().find_by_email(email.as_str()).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        // We use a dummy hash that will always fail verification.
        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, account_usable) = match &user_result {
            Some(user) => (user.password_hash.as_str(), user.is_active),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if the account exists, is active, AND the password matches
        if !account_usable || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since account_usable implies the user was found
        generate_token(user_result.as_ref().unwrap(), &self.config)
    }

    async fn logout(&self) -> AppResult<()> {
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
