//! Stone entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{RosterEntry, Stone};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the stones table.
#[derive(Debug, Clone, FromRow)]
pub struct StoneEntity {
    pub id: Uuid,
    pub qr_token: String,
    pub code: String,
    pub is_active: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub creator_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<StoneEntity> for Stone {
    fn from(entity: StoneEntity) -> Self {
        Self {
            id: entity.id,
            qr_token: entity.qr_token,
            code: entity.code,
            is_active: entity.is_active,
            name: entity.name,
            description: entity.description,
            creator_user_id: entity.creator_user_id,
            created_at: entity.created_at,
        }
    }
}

/// A stones row joined with the creator's nickname.
#[derive(Debug, Clone, FromRow)]
pub struct StoneWithCreatorEntity {
    #[sqlx(flatten)]
    pub stone: StoneEntity,
    pub creator_nickname: Option<String>,
}

/// A stones row left-joined with its latest location event.
#[derive(Debug, Clone, FromRow)]
pub struct RosterEntryEntity {
    #[sqlx(flatten)]
    pub stone: StoneEntity,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo_url: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl From<RosterEntryEntity> for RosterEntry {
    fn from(entity: RosterEntryEntity) -> Self {
        Self {
            stone: entity.stone.into(),
            latitude: entity.latitude,
            longitude: entity.longitude,
            photo_url: entity.photo_url,
            last_seen_at: entity.last_seen_at,
        }
    }
}
