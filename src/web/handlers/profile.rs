//! Profile handlers for the authenticated user.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{UserRepository, UserUpdate};
use crate::web::dto::{ApiResponse, ProfileResponse, UpdateProfileRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::auth::AppState;

/// GET /api/auth/profile - Return the bearer-token principal's profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let users = UserRepository::new(state.db.pool());

    // The account may have been removed after the token was issued
    let user = users
        .get_by_id(auth.0.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Json(ApiResponse::new(ProfileResponse::from(&user))))
}

/// PUT /api/auth/profile/update - Partial update of the mutable profile fields.
///
/// Only first_name and last_name are writable. Immutable fields appearing
/// in the payload are ignored rather than rejected.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let users = UserRepository::new(state.db.pool());

    let mut update = UserUpdate::new();
    if let Some(first_name) = req.first_name {
        update = update.first_name(first_name);
    }
    if let Some(last_name) = req.last_name {
        update = update.last_name(last_name);
    }

    let user = if update.is_empty() {
        users
            .get_by_id(auth.0.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?
    } else {
        users
            .update(auth.0.sub, &update)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?
    };

    tracing::debug!(user_id = user.id, "Profile updated");

    Ok(Json(ApiResponse::new(ProfileResponse::from(&user))))
}
