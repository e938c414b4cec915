//! Stone repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{RosterEntryEntity, StoneEntity, StoneWithCreatorEntity};
use crate::metrics::QueryTimer;

/// Result of an activation attempt.
#[derive(Debug, Clone)]
pub enum ActivationOutcome {
    Activated(StoneEntity),
    AlreadyActive,
    NotFound,
}

/// Repository for stone-related database operations.
#[derive(Clone)]
pub struct StoneRepository {
    pool: PgPool,
}

impl StoneRepository {
    /// Creates a new StoneRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a stone by ID together with its creator's nickname.
    pub async fn find_by_id_with_creator(
        &self,
        id: Uuid,
    ) -> Result<Option<StoneWithCreatorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_stone_with_creator");
        let result = sqlx::query_as::<_, StoneWithCreatorEntity>(
            r#"
            SELECT s.id, s.qr_token, s.code, s.is_active, s.name, s.description,
                   s.creator_user_id, s.created_at, u.nickname AS creator_nickname
            FROM stones s
            LEFT JOIN users u ON s.creator_user_id = u.id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a stone by its QR token.
    pub async fn find_by_qr_token(
        &self,
        qr_token: &str,
    ) -> Result<Option<StoneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_stone_by_qr_token");
        let result = sqlx::query_as::<_, StoneEntity>(
            r#"
            SELECT id, qr_token, code, is_active, name, description, creator_user_id, created_at
            FROM stones
            WHERE qr_token = $1
            "#,
        )
        .bind(qr_token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a stone with this ID exists.
    pub async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("stone_exists");
        let result: Result<(bool,), sqlx::Error> =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM stones WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        Ok(result?.0)
    }

    /// Activate an inactive stone.
    ///
    /// The update only matches rows with `is_active = false`, so two
    /// concurrent activations cannot both succeed.
    pub async fn activate(
        &self,
        qr_token: &str,
        name: &str,
        description: &str,
        creator_user_id: Uuid,
    ) -> Result<ActivationOutcome, sqlx::Error> {
        let timer = QueryTimer::new("activate_stone");
        let updated = sqlx::query_as::<_, StoneEntity>(
            r#"
            UPDATE stones
            SET name = $2, description = $3, creator_user_id = $4, is_active = true
            WHERE qr_token = $1 AND is_active = false
            RETURNING id, qr_token, code, is_active, name, description, creator_user_id, created_at
            "#,
        )
        .bind(qr_token)
        .bind(name)
        .bind(description)
        .bind(creator_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        if let Some(stone) = updated? {
            return Ok(ActivationOutcome::Activated(stone));
        }

        Ok(match self.find_by_qr_token(qr_token).await? {
            Some(_) => ActivationOutcome::AlreadyActive,
            None => ActivationOutcome::NotFound,
        })
    }

    /// All active stones, each with its latest location event (if any).
    ///
    /// Latest-per-stone is rank 1 of a window over `stone_locations`
    /// partitioned by stone; the LEFT JOIN keeps never-located stones.
    pub async fn find_active_with_latest(&self) -> Result<Vec<RosterEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_stones_with_latest");
        let result = sqlx::query_as::<_, RosterEntryEntity>(
            r#"
            SELECT s.id, s.qr_token, s.code, s.is_active, s.name, s.description,
                   s.creator_user_id, s.created_at,
                   latest.latitude, latest.longitude, latest.photo_url,
                   latest.created_at AS last_seen_at
            FROM stones s
            LEFT JOIN (
                SELECT stone_id, latitude, longitude, photo_url, created_at,
                       ROW_NUMBER() OVER (
                           PARTITION BY stone_id
                           ORDER BY created_at DESC, id DESC
                       ) AS rn
                FROM stone_locations
            ) latest ON latest.stone_id = s.id AND latest.rn = 1
            WHERE s.is_active = true
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert an inactive stone for a token unless the token already exists.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn insert_inactive(&self, qr_token: &str, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("insert_inactive_stone");
        let result = sqlx::query(
            r#"
            INSERT INTO stones (qr_token, code, is_active)
            VALUES ($1, $2, false)
            ON CONFLICT (qr_token) DO NOTHING
            "#,
        )
        .bind(qr_token)
        .bind(code)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() == 1)
    }
}
