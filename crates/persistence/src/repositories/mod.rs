//! Repository implementations for database operations.

pub mod stone;
pub mod stone_location;
pub mod user;

pub use stone::{ActivationOutcome, StoneRepository};
pub use stone_location::{StoneLocationInput, StoneLocationRepository};
pub use user::UserRepository;
