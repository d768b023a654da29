//! Restaurant Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use feast_app::domain::restaurants::data::RestaurantFilter;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{errors::into_api_error, models::RestaurantResponse},
    state::State,
};

/// Restaurant Index Handler
///
/// Lists restaurants with their menus. `search` and `location` match case-insensitive
/// substrings, `rating` is a minimum.
#[endpoint(
    tags("restaurants"),
    summary = "List Restaurants",
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Rating outside 0 to 5"),
    ),
)]
pub(crate) async fn handler(
    search: QueryParam<String, false>,
    location: QueryParam<String, false>,
    rating: QueryParam<f64, false>,
    depot: &mut Depot,
) -> Result<ApiResponse<Vec<RestaurantResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = RestaurantFilter {
        search: search.into_inner(),
        location: location.into_inner(),
        min_rating: rating.into_inner(),
    };

    let restaurants = state
        .app
        .restaurants
        .list_restaurants(filter)
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch restaurants"))?;

    Ok(ApiResponse::ok(
        restaurants.into_iter().map(Into::into).collect(),
    ))
}
