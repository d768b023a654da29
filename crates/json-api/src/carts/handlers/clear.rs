//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::errors::into_api_error,
    envelope::{ApiError, ApiResponse, NoData},
    extensions::*,
    observability::{CartMutation, record_cart_mutation},
    state::State,
};

/// Clear Cart Handler
///
/// Deletes the authenticated user's cart. Clearing an absent cart succeeds.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
    ),
)]
#[tracing::instrument(
    name = "carts.clear",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<ApiResponse<NoData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

    state
        .app
        .carts
        .clear_cart(user.uuid)
        .await
        .map_err(|error| into_api_error(error, "Failed to clear cart"))?;

    tracing::info!(user_uuid = %user.uuid, "cleared cart");

    record_cart_mutation(CartMutation::Clear);

    Ok(ApiResponse::message("Cart cleared successfully"))
}
