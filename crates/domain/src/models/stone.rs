//! Stone domain models and read models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::location::{StoneLocation, StoneLocationView};

/// How many events the stone detail view carries.
pub const RECENT_LOCATIONS_LIMIT: usize = 5;

/// Length of the short code derived from a QR token.
pub const SHORT_CODE_LEN: usize = 4;

/// A physical token whose location is tracked.
///
/// Stones are pre-seeded inactive with only a `qr_token` and `code`; name,
/// description and creator are set once, on activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stone {
    pub id: Uuid,
    pub qr_token: String,
    pub code: String,
    pub is_active: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub creator_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Stone {
    /// Short code printed next to the QR code: the first characters of the token.
    pub fn short_code(qr_token: &str) -> String {
        qr_token.trim().chars().take(SHORT_CODE_LEN).collect()
    }
}

/// A stone with its creator and latest sightings.
///
/// `latest_location` is always the head of `recent_locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoneDetail {
    #[serde(flatten)]
    pub stone: Stone,
    pub creator_nickname: Option<String>,
    pub latest_location: Option<StoneLocationView>,
    pub recent_locations: Vec<StoneLocationView>,
}

impl StoneDetail {
    /// Builds the detail view from the stone and its most recent events.
    ///
    /// The events are put in newest-first order and cut to
    /// [`RECENT_LOCATIONS_LIMIT`] before the latest is taken from the head,
    /// so callers may pass a wider or unordered slice of the log.
    pub fn assemble(
        stone: Stone,
        creator_nickname: Option<String>,
        mut recent_locations: Vec<StoneLocationView>,
    ) -> Self {
        recent_locations.sort_by(|a, b| StoneLocation::newest_first(&a.location, &b.location));
        recent_locations.truncate(RECENT_LOCATIONS_LIMIT);
        let latest_location = recent_locations.first().cloned();

        Self {
            stone,
            creator_nickname,
            latest_location,
            recent_locations,
        }
    }
}

/// An active stone annotated with its latest sighting.
///
/// Location fields are all `None` for a stone that was never located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub stone: Stone,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo_url: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl RosterEntry {
    /// Latest known `(latitude, longitude)`, if both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Response of the lookup-by-token endpoint.
///
/// Inactive stones only reveal that they can be activated.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StoneByTokenResponse {
    Inactive { is_active: bool },
    Active(Box<StoneDetail>),
}

impl StoneByTokenResponse {
    pub fn inactive() -> Self {
        StoneByTokenResponse::Inactive { is_active: false }
    }
}

/// Request payload for stone activation.
///
/// Missing fields deserialize as empty strings so they fail validation
/// instead of JSON parsing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivateStoneRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub qr_token: String,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 2000, message = "Description must be at most 2000 characters")
    )]
    pub description: String,
}
