//! Stone location entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{StoneLocation, StoneLocationView};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the stone_locations table.
#[derive(Debug, Clone, FromRow)]
pub struct StoneLocationEntity {
    pub id: Uuid,
    pub stone_id: Uuid,
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StoneLocationEntity> for StoneLocation {
    fn from(entity: StoneLocationEntity) -> Self {
        Self {
            id: entity.id,
            stone_id: entity.stone_id,
            user_id: entity.user_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            note: entity.note,
            photo_url: entity.photo_url,
            created_at: entity.created_at,
        }
    }
}

/// A stone_locations row joined with the reporter's nickname.
#[derive(Debug, Clone, FromRow)]
pub struct StoneLocationWithUserEntity {
    #[sqlx(flatten)]
    pub location: StoneLocationEntity,
    pub user_nickname: Option<String>,
}

impl From<StoneLocationWithUserEntity> for StoneLocationView {
    fn from(entity: StoneLocationWithUserEntity) -> Self {
        Self {
            location: entity.location.into(),
            user_nickname: entity.user_nickname,
        }
    }
}
