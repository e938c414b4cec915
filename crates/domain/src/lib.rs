//! Domain layer for the GeoStone backend.
//!
//! This crate contains:
//! - Domain models (User, Stone, StoneLocation) and their read models
//! - Geographic services (distance, proximity filtering)

pub mod models;
pub mod services;
