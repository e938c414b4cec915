//! The authenticated user's profile.

use axum::{extract::State, Json};

use domain::models::{User, UserProfile};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// GET /api/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserProfile>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    // A valid token can outlive its account.
    let user: User = repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    let stones_created = repo.count_stones_created(auth.user_id).await?;
    let stones_moved = repo.count_stones_moved(auth.user_id).await?;

    Ok(Json(UserProfile::new(user, stones_created, stones_moved)))
}
