//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    envelope::{ApiError, ApiResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the authenticated user's cart as stored.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<ApiResponse<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user.uuid)
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch cart"))?;

    Ok(ApiResponse::ok(cart.into()))
}
