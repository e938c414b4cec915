//! Shared utilities for the GeoStone backend.
//!
//! - Session tokens (HS256 JWT)
//! - Password hashing with Argon2id
//! - Coordinate validation

pub mod jwt;
pub mod password;
pub mod validation;
