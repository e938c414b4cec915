//! Application services used by the route handlers.

pub mod auth;
pub mod photo_storage;
pub mod stones;

pub use auth::AuthService;
pub use photo_storage::PhotoStorage;
pub use stones::StoneService;
