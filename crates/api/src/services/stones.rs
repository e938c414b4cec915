//! Stone read paths, activation and location reporting.

use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use domain::models::{
    LocationReport, LocationReportError, RosterEntry, Stone, StoneByTokenResponse, StoneDetail,
    StoneLocation, StoneLocationView, RECENT_LOCATIONS_LIMIT,
};
use persistence::repositories::{
    ActivationOutcome, StoneLocationInput, StoneLocationRepository, StoneRepository,
};

use crate::services::photo_storage::{PhotoStorage, StorageError};

#[derive(Debug, Error)]
pub enum StoneError {
    #[error("Stone not found")]
    NotFound,

    #[error("Stone already active")]
    AlreadyActive,

    #[error("Invalid location report: {0}")]
    InvalidReport(#[from] LocationReportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A photo received with a location report.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Raw fields of a location report as received from the client.
#[derive(Debug, Clone, Default)]
pub struct LocationForm {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub note: Option<String>,
    pub photo: Option<PhotoUpload>,
}

pub struct StoneService {
    stones: StoneRepository,
    locations: StoneLocationRepository,
    photos: PhotoStorage,
}

impl StoneService {
    pub fn new(pool: PgPool, photos: PhotoStorage) -> Self {
        Self {
            stones: StoneRepository::new(pool.clone()),
            locations: StoneLocationRepository::new(pool),
            photos,
        }
    }

    /// Stone with creator nickname and its most recent sightings.
    ///
    /// Anything that is not a UUID cannot name a stone.
    pub async fn get_stone_detail(&self, stone_id: &str) -> Result<StoneDetail, StoneError> {
        let id = Uuid::parse_str(stone_id).map_err(|_| StoneError::NotFound)?;
        self.detail(id).await
    }

    async fn detail(&self, id: Uuid) -> Result<StoneDetail, StoneError> {
        let found = self
            .stones
            .find_by_id_with_creator(id)
            .await?
            .ok_or(StoneError::NotFound)?;

        let recent: Vec<StoneLocationView> = self
            .locations
            .find_recent_by_stone(id, RECENT_LOCATIONS_LIMIT as i64)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(StoneDetail::assemble(
            found.stone.into(),
            found.creator_nickname,
            recent,
        ))
    }

    /// Every active stone with its latest sighting, in storage order.
    pub async fn get_active_stones(&self) -> Result<Vec<RosterEntry>, StoneError> {
        let roster = self.stones.find_active_with_latest().await?;
        Ok(roster.into_iter().map(Into::into).collect())
    }

    /// Resolves a scanned QR token.
    pub async fn lookup_by_token(&self, qr_token: &str) -> Result<StoneByTokenResponse, StoneError> {
        let stone: Stone = self
            .stones
            .find_by_qr_token(qr_token)
            .await?
            .ok_or(StoneError::NotFound)?
            .into();

        if !stone.is_active {
            return Ok(StoneByTokenResponse::inactive());
        }

        let detail = self.detail(stone.id).await?;
        Ok(StoneByTokenResponse::Active(Box::new(detail)))
    }

    /// Claims an inactive stone for `creator_user_id`.
    ///
    /// Inputs are expected to be validated already.
    pub async fn activate(
        &self,
        qr_token: &str,
        name: &str,
        description: &str,
        creator_user_id: Uuid,
    ) -> Result<StoneDetail, StoneError> {
        let outcome = self
            .stones
            .activate(qr_token.trim(), name.trim(), description.trim(), creator_user_id)
            .await?;

        match outcome {
            ActivationOutcome::Activated(stone) => self.detail(stone.id).await,
            ActivationOutcome::AlreadyActive => Err(StoneError::AlreadyActive),
            ActivationOutcome::NotFound => Err(StoneError::NotFound),
        }
    }

    /// Appends a sighting of a stone.
    ///
    /// Coordinates are validated before any storage access. The photo is
    /// written first and removed again if the insert fails.
    pub async fn report_location(
        &self,
        stone_id: &str,
        user_id: Uuid,
        form: LocationForm,
    ) -> Result<StoneLocation, StoneError> {
        let report = LocationReport::parse(
            form.latitude.as_deref(),
            form.longitude.as_deref(),
            form.note.as_deref(),
        )?;

        let stone_id = Uuid::parse_str(stone_id).map_err(|_| StoneError::NotFound)?;
        if !self.stones.exists(stone_id).await? {
            return Err(StoneError::NotFound);
        }

        self.append(stone_id, user_id, report, form.photo).await
    }

    async fn append(
        &self,
        stone_id: Uuid,
        user_id: Uuid,
        report: LocationReport,
        photo: Option<PhotoUpload>,
    ) -> Result<StoneLocation, StoneError> {
        let photo_url = match photo {
            Some(photo) => Some(self.photos.store(photo.file_name.as_deref(), &photo.data).await?),
            None => None,
        };

        let input = StoneLocationInput {
            stone_id,
            user_id,
            latitude: report.latitude,
            longitude: report.longitude,
            note: report.note,
            photo_url: photo_url.clone(),
        };

        match self.locations.insert(input).await {
            Ok(location) => Ok(location.into()),
            Err(e) => {
                if let Some(url) = photo_url {
                    if let Err(cleanup) = self.photos.remove(&url).await {
                        warn!(url = %url, error = %cleanup, "Failed to remove orphaned photo");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Full history of a stone, newest first.
    ///
    /// An id that is not a UUID has no history.
    pub async fn location_history(
        &self,
        stone_id: &str,
    ) -> Result<Vec<StoneLocationView>, StoneError> {
        let Ok(id) = Uuid::parse_str(stone_id) else {
            return Ok(Vec::new());
        };

        let history = self.locations.find_all_by_stone(id).await?;
        Ok(history.into_iter().map(Into::into).collect())
    }
}
