//! Menu Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{errors::into_api_error, models::MenuItemResponse},
    state::State,
};

/// Menu Index Handler
///
/// Lists a restaurant's menu in display order.
#[endpoint(
    tags("menu"),
    summary = "List Menu Items",
    responses(
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant not found"),
    ),
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<Vec<MenuItemResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let items = state
        .app
        .restaurants
        .list_menu_items(restaurant.into_inner().into())
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch menu items"))?;

    Ok(ApiResponse::ok(items.into_iter().map(Into::into).collect()))
}
