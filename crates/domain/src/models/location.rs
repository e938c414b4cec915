//! Stone location events.
//!
//! A location event is one sighting of a stone reported by a user. Events are
//! append-only; every read orders them by `created_at` descending with `id`
//! descending as the tie-break.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use uuid::Uuid;

use shared::validation::{parse_finite, validate_latitude, validate_longitude};

/// A row of the `stone_locations` log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoneLocation {
    pub id: Uuid,
    pub stone_id: Uuid,
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoneLocation {
    /// Newest-first ordering used by every history read.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// A location event together with the reporter's nickname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoneLocationView {
    #[serde(flatten)]
    pub location: StoneLocation,
    pub user_nickname: Option<String>,
}

/// Why a location report was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationReportError {
    #[error("Missing coordinates")]
    MissingCoordinates,

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("{0}")]
    OutOfRange(String),
}

/// A validated location report, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReport {
    pub latitude: f64,
    pub longitude: f64,
    pub note: Option<String>,
}

impl LocationReport {
    /// Builds a report from raw form values.
    ///
    /// Both coordinates are required. A blank note is treated as absent.
    pub fn parse(
        latitude: Option<&str>,
        longitude: Option<&str>,
        note: Option<&str>,
    ) -> Result<Self, LocationReportError> {
        let latitude = latitude.filter(|v| !v.trim().is_empty());
        let longitude = longitude.filter(|v| !v.trim().is_empty());

        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(LocationReportError::MissingCoordinates);
        };

        let latitude = parse_finite(latitude).ok_or(LocationReportError::NotANumber("latitude"))?;
        let longitude =
            parse_finite(longitude).ok_or(LocationReportError::NotANumber("longitude"))?;

        for check in [validate_latitude(latitude), validate_longitude(longitude)] {
            check.map_err(|e| {
                LocationReportError::OutOfRange(
                    e.message
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                )
            })?;
        }

        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            latitude,
            longitude,
            note,
        })
    }
}
