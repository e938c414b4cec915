//! Domain services for GeoStone.
//!
//! Pure functions over domain models; no I/O.

pub mod proximity;

pub use proximity::{filter_by_radius, haversine_km, EARTH_RADIUS_KM};
