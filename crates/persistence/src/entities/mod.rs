//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod stone;
pub mod stone_location;
pub mod user;

pub use stone::{RosterEntryEntity, StoneEntity, StoneWithCreatorEntity};
pub use stone_location::{StoneLocationEntity, StoneLocationWithUserEntity};
pub use user::UserEntity;
