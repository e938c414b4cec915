//! Stone location repository.
//!
//! The `stone_locations` table is append-only: this repository only inserts
//! and reads. Reads are ordered `created_at DESC, id DESC`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{StoneLocationEntity, StoneLocationWithUserEntity};
use crate::metrics::QueryTimer;

/// Input for inserting a location event.
#[derive(Debug, Clone)]
pub struct StoneLocationInput {
    pub stone_id: Uuid,
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub note: Option<String>,
    pub photo_url: Option<String>,
}

/// Repository for the stone location log.
#[derive(Clone)]
pub struct StoneLocationRepository {
    pool: PgPool,
}

impl StoneLocationRepository {
    /// Creates a new StoneLocationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a location event.
    pub async fn insert(
        &self,
        input: StoneLocationInput,
    ) -> Result<StoneLocationEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_stone_location");
        let result = sqlx::query_as::<_, StoneLocationEntity>(
            r#"
            INSERT INTO stone_locations (stone_id, user_id, latitude, longitude, note, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, stone_id, user_id, latitude, longitude, note, photo_url, created_at
            "#,
        )
        .bind(input.stone_id)
        .bind(input.user_id)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.note)
        .bind(input.photo_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The `limit` most recent events of a stone, newest first.
    pub async fn find_recent_by_stone(
        &self,
        stone_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StoneLocationWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_recent_stone_locations");
        let result = sqlx::query_as::<_, StoneLocationWithUserEntity>(
            r#"
            SELECT sl.id, sl.stone_id, sl.user_id, sl.latitude, sl.longitude, sl.note,
                   sl.photo_url, sl.created_at, u.nickname AS user_nickname
            FROM stone_locations sl
            LEFT JOIN users u ON sl.user_id = u.id
            WHERE sl.stone_id = $1
            ORDER BY sl.created_at DESC, sl.id DESC
            LIMIT $2
            "#,
        )
        .bind(stone_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Every event of a stone, newest first.
    pub async fn find_all_by_stone(
        &self,
        stone_id: Uuid,
    ) -> Result<Vec<StoneLocationWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_stone_locations");
        let result = sqlx::query_as::<_, StoneLocationWithUserEntity>(
            r#"
            SELECT sl.id, sl.stone_id, sl.user_id, sl.latitude, sl.longitude, sl.note,
                   sl.photo_url, sl.created_at, u.nickname AS user_nickname
            FROM stone_locations sl
            LEFT JOIN users u ON sl.user_id = u.id
            WHERE sl.stone_id = $1
            ORDER BY sl.created_at DESC, sl.id DESC
            "#,
        )
        .bind(stone_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
