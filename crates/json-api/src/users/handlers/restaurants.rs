//! Owned Restaurants Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{errors::into_api_error, models::RestaurantResponse},
    state::State,
};

/// Owned Restaurants Handler
///
/// Returns the restaurants owned by the authenticated user.
#[endpoint(
    tags("users"),
    summary = "List Owned Restaurants",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<ApiResponse<Vec<RestaurantResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let restaurants = state
        .app
        .restaurants
        .list_owned_restaurants(user.uuid)
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch your restaurants"))?;

    Ok(ApiResponse::ok(
        restaurants.into_iter().map(Into::into).collect(),
    ))
}
