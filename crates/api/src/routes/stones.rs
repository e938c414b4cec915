//! Stone endpoints: roster, lookup, activation and location history.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use domain::models::{
    ActivateStoneRequest, RosterEntry, StoneByTokenResponse, StoneDetail, StoneLocation,
    StoneLocationView,
};
use domain::services::filter_by_radius;
use shared::validation::parse_finite;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_location_reported, record_stone_activated};
use crate::middleware::UserAuth;
use crate::services::stones::{LocationForm, PhotoUpload};
use crate::services::StoneService;

fn stone_service(state: &AppState) -> StoneService {
    StoneService::new(state.pool.clone(), state.photos.clone())
}

/// Optional "stones near me" parameters of the roster endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearQuery {
    pub near_lat: Option<String>,
    pub near_lng: Option<String>,
    pub radius_km: Option<String>,
}

/// A parsed proximity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearFilter {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
}

impl NearQuery {
    /// `None` unless all three values are present and non-empty; each
    /// present value must then be a finite number.
    pub fn parse(&self) -> Result<Option<NearFilter>, ApiError> {
        let (Some(lat), Some(lng), Some(radius)) = (
            present(&self.near_lat),
            present(&self.near_lng),
            present(&self.radius_km),
        ) else {
            return Ok(None);
        };

        Ok(Some(NearFilter {
            lat: number("nearLat", lat)?,
            lng: number("nearLng", lng)?,
            radius_km: number("radiusKm", radius)?,
        }))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn number(name: &str, raw: &str) -> Result<f64, ApiError> {
    parse_finite(raw).ok_or_else(|| ApiError::Validation(format!("{} must be a number", name)))
}

/// GET /api/stones
///
/// All active stones with their latest sighting, optionally narrowed to
/// those within `radiusKm` of (`nearLat`, `nearLng`).
pub async fn list_stones(
    State(state): State<AppState>,
    Query(query): Query<NearQuery>,
) -> Result<Json<Vec<RosterEntry>>, ApiError> {
    let near = query.parse()?;

    let roster = stone_service(&state).get_active_stones().await?;

    let roster = match near {
        Some(f) => filter_by_radius(roster, f.lat, f.lng, f.radius_km),
        None => roster,
    };

    Ok(Json(roster))
}

/// GET /api/stones/by-token/:qr_token
pub async fn get_by_token(
    State(state): State<AppState>,
    Path(qr_token): Path<String>,
) -> Result<Json<StoneByTokenResponse>, ApiError> {
    let response = stone_service(&state).lookup_by_token(&qr_token).await?;
    Ok(Json(response))
}

/// POST /api/stones/activate
pub async fn activate_stone(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<ActivateStoneRequest>,
) -> Result<Json<StoneDetail>, ApiError> {
    request.validate()?;

    let detail = stone_service(&state)
        .activate(
            &request.qr_token,
            &request.name,
            &request.description,
            auth.user_id,
        )
        .await?;

    record_stone_activated();
    info!(
        stone_id = %detail.stone.id,
        user_id = %auth.user_id,
        "Stone activated"
    );

    Ok(Json(detail))
}

/// GET /api/stones/:stone_id
pub async fn get_stone(
    State(state): State<AppState>,
    Path(stone_id): Path<String>,
) -> Result<Json<StoneDetail>, ApiError> {
    let detail = stone_service(&state).get_stone_detail(&stone_id).await?;
    Ok(Json(detail))
}

/// GET /api/stones/:stone_id/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Path(stone_id): Path<String>,
) -> Result<Json<Vec<StoneLocationView>>, ApiError> {
    let history = stone_service(&state).location_history(&stone_id).await?;
    Ok(Json(history))
}

/// POST /api/stones/:stone_id/locations
///
/// `multipart/form-data` with `latitude`, `longitude`, optional `note` and
/// an optional `photo` file.
pub async fn report_location(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(stone_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<StoneLocation>, ApiError> {
    let form = read_location_form(multipart).await?;
    let with_photo = form.photo.is_some();

    let location = stone_service(&state)
        .report_location(&stone_id, auth.user_id, form)
        .await?;

    record_location_reported(with_photo);
    info!(
        stone_id = %location.stone_id,
        location_id = %location.id,
        user_id = %auth.user_id,
        "Stone location reported"
    );

    Ok(Json(location))
}

async fn read_location_form(mut multipart: Multipart) -> Result<LocationForm, ApiError> {
    let mut form = LocationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "latitude" => form.latitude = Some(field.text().await.map_err(invalid_multipart)?),
            "longitude" => form.longitude = Some(field.text().await.map_err(invalid_multipart)?),
            "note" => form.note = Some(field.text().await.map_err(invalid_multipart)?),
            "photo" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(invalid_multipart)?;
                // Browsers send an empty part when no file was chosen.
                if !data.is_empty() {
                    form.photo = Some(PhotoUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn invalid_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("Invalid multipart body: {}", e))
}
