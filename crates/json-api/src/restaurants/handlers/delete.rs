//! Delete Restaurant Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResponse, NoData},
    extensions::*,
    restaurants::errors::into_api_error,
    state::State,
};

/// Delete Restaurant Handler
///
/// Deletes a restaurant and its menu. Restaurants with orders are kept.
#[endpoint(
    tags("restaurants"),
    summary = "Delete Restaurant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant not found"),
        (status_code = StatusCode::CONFLICT, description = "Restaurant has orders"),
    ),
)]
#[tracing::instrument(
    name = "restaurants.delete",
    skip(restaurant, depot),
    fields(
        user_uuid = tracing::field::Empty,
        restaurant_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<NoData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let restaurant = restaurant.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("restaurant_uuid", tracing::field::display(restaurant));

    state
        .app
        .restaurants
        .delete_restaurant(user.uuid, restaurant.into())
        .await
        .map_err(|error| into_api_error(error, "Failed to delete restaurant"))?;

    tracing::info!(restaurant_uuid = %restaurant, "deleted restaurant");

    Ok(ApiResponse::message("Restaurant deleted successfully"))
}
