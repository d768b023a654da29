//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{
        errors::into_api_error,
        models::{CartResponse, line_quantity},
    },
    envelope::{ApiError, ApiResponse},
    extensions::*,
    observability::{CartMutation, record_cart_mutation},
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// The new quantity. Zero removes the line.
    pub quantity: i64,
}

/// Update Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity provided"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or cart item not found"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(item, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        menu_item_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let item = item.into_inner();
    let requested = json.into_inner().quantity;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("menu_item_uuid", tracing::field::display(item));
    span.record("quantity", requested);

    let quantity = line_quantity(requested, 0)?;

    let cart = state
        .app
        .carts
        .update_quantity(user.uuid, item.into(), quantity)
        .await
        .map_err(|error| into_api_error(error, "Failed to update cart item quantity"))?;

    tracing::info!(
        menu_item_uuid = %item,
        quantity,
        total_price = cart.total_price,
        "updated cart item quantity"
    );

    record_cart_mutation(CartMutation::Update);

    Ok(ApiResponse::ok(cart.into()).with_message("Cart updated successfully"))
}
