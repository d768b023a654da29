//! Order Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

/// Order Index Handler
///
/// Returns the authenticated user's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<ApiResponse<Vec<OrderResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(user.uuid)
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch orders"))?;

    Ok(ApiResponse::ok(orders.into_iter().map(Into::into).collect()))
}
