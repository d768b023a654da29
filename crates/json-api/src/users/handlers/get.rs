//! Get Profile Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    state::State,
    users::{errors::into_api_error, models::UserResponse},
};

/// Get Profile Handler
///
/// Returns the authenticated user's profile.
#[endpoint(
    tags("users"),
    summary = "Get Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<ApiResponse<UserResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let profile = state
        .app
        .users
        .get_user(user.uuid)
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch user profile"))?;

    Ok(ApiResponse::ok(profile.into()))
}
