//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Visible to the customer who placed the order and to the restaurant's owner.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::FORBIDDEN, description = "Caller cannot see this order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user.uuid, order.into_inner().into())
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch order"))?;

    Ok(ApiResponse::ok(order.into()))
}
