//! Get Restaurant Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{errors::into_api_error, models::RestaurantResponse},
    state::State,
};

/// Get Restaurant Handler
///
/// Returns a restaurant with its full menu.
#[endpoint(
    tags("restaurants"),
    summary = "Get Restaurant",
    responses(
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant not found"),
    ),
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<RestaurantResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let restaurant = state
        .app
        .restaurants
        .get_restaurant(restaurant.into_inner().into())
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch restaurant"))?;

    Ok(ApiResponse::ok(restaurant.into()))
}
