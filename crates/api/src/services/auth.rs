//! Authentication service for user registration and login.

use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use persistence::repositories::UserRepository;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt_config: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_config: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_config,
        }
    }

    /// Register a new user and sign them in.
    ///
    /// Emails are stored lowercased; a duplicate is reported as
    /// [`AuthError::EmailAlreadyExists`].
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<AuthResult, AuthError> {
        let email = email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        // Unique violation covers a concurrent registration with the same email
        let user = match self
            .users
            .create_user(&email, &password_hash, nickname.trim())
            .await
        {
            Ok(user) => user,
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let (token, _jti) = self.jwt_config.issue_token(user.id, &user.email)?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            token,
        })
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, _jti) = self.jwt_config.issue_token(user.id, &user.email)?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            token,
        })
    }
}
