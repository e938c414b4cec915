//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user's own profile with activity counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    /// Stones this user activated.
    pub stones_created: i64,
    /// Distinct stones this user reported a location for.
    pub stones_moved: i64,
}

impl UserProfile {
    pub fn new(user: User, stones_created: i64, stones_moved: i64) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            created_at: user.created_at,
            stones_created,
            stones_moved,
        }
    }
}
