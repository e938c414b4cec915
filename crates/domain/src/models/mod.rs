//! Domain models for GeoStone.

pub mod location;
pub mod stone;
pub mod user;

pub use location::{LocationReport, LocationReportError, StoneLocation, StoneLocationView};
pub use stone::{
    ActivateStoneRequest, RosterEntry, Stone, StoneByTokenResponse, StoneDetail,
    RECENT_LOCATIONS_LIMIT,
};
pub use user::{User, UserProfile};
