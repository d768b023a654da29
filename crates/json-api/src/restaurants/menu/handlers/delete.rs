//! Delete Menu Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResponse, NoData},
    extensions::*,
    restaurants::errors::into_api_error,
    state::State,
};

/// Delete Menu Item Handler
///
/// Carts still holding the item keep their line until checkout.
#[endpoint(
    tags("menu"),
    summary = "Delete Menu Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant or menu item not found"),
    ),
)]
#[tracing::instrument(
    name = "menu.delete",
    skip(restaurant, item, depot),
    fields(
        restaurant_uuid = tracing::field::Empty,
        menu_item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<NoData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let restaurant = restaurant.into_inner();
    let item = item.into_inner();

    let span = tracing::Span::current();

    span.record("restaurant_uuid", tracing::field::display(restaurant));
    span.record("menu_item_uuid", tracing::field::display(item));

    state
        .app
        .restaurants
        .delete_menu_item(user.uuid, restaurant.into(), item.into())
        .await
        .map_err(|error| into_api_error(error, "Failed to delete menu item"))?;

    tracing::info!(menu_item_uuid = %item, "deleted menu item");

    Ok(ApiResponse::message("Menu item deleted successfully"))
}
