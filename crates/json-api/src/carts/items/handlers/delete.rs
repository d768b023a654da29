//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    envelope::{ApiError, ApiResponse},
    extensions::*,
    observability::{CartMutation, record_cart_mutation},
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing an item that is not in the cart leaves the cart unchanged.
#[endpoint(
    tags("cart"),
    summary = "Remove Item from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.remove",
    skip(item, depot),
    fields(
        user_uuid = tracing::field::Empty,
        menu_item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let item = item.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("menu_item_uuid", tracing::field::display(item));

    let cart = state
        .app
        .carts
        .remove_item(user.uuid, item.into())
        .await
        .map_err(|error| into_api_error(error, "Failed to remove item from cart"))?;

    tracing::info!(menu_item_uuid = %item, total_price = cart.total_price, "removed item from cart");

    record_cart_mutation(CartMutation::Remove);

    Ok(ApiResponse::ok(cart.into()).with_message("Item removed from cart"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use feast_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        restaurants::models::MenuItemUuid,
    };

    use crate::test_helpers::{
        StateBuilder, TEST_USER_UUID, authenticated_service, make_cart, make_cart_line,
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        authenticated_service(
            StateBuilder::new().carts(carts),
            Router::with_path("cart/items/{item}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_remove_item_returns_remaining_cart() -> TestResult {
        let removed = MenuItemUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, item| *user == TEST_USER_UUID && *item == removed)
            .return_once(|_, _| Ok(make_cart(vec![make_cart_line(MenuItemUuid::new(), 5, 3)])));

        let mut res = TestClient::delete(format!("http://example.com/cart/items/{removed}"))
            .send(&make_service(carts))
            .await;

        let body: ApiResponse<CartResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message.as_deref(), Some("Item removed from cart"));
        assert_eq!(body.data.map(|cart| cart.total_price), Some(15));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_without_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/cart/items/{}",
            MenuItemUuid::new()
        ))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
