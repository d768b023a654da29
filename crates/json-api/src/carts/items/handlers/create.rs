//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
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

fn one() -> i64 {
    1
}

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// The menu item to add
    pub item: Uuid,

    /// How many to add, at least one
    #[serde(default = "one")]
    pub quantity: i64,
}

/// Add Cart Item Handler
///
/// Adds a menu item to the cart, creating the cart on first use. Adding an item
/// already in the cart increases its quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity provided"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::CONFLICT, description = "Cart holds items from another restaurant"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.add",
    skip(json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        menu_item_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<ApiResponse<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("menu_item_uuid", tracing::field::display(request.item));
    span.record("quantity", request.quantity);

    let quantity = line_quantity(request.quantity, 1)?;

    let cart = state
        .app
        .carts
        .add_item(user.uuid, request.item.into(), quantity)
        .await
        .map_err(|error| into_api_error(error, "Failed to add item to cart"))?;

    tracing::info!(
        menu_item_uuid = %request.item,
        quantity,
        total_price = cart.total_price,
        "added item to cart"
    );

    record_cart_mutation(CartMutation::Add);

    Ok(ApiResponse::ok(cart.into()).with_message("Item added to cart"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feast_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        restaurants::models::MenuItemUuid,
    };

    use crate::{
        envelope::ErrorBody,
        test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_cart, make_cart_line},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        authenticated_service(
            StateBuilder::new().carts(carts),
            Router::with_path("cart/items").post(handler),
        )
    }

    #[tokio::test]
    async fn test_add_item_returns_updated_cart() -> TestResult {
        let item = MenuItemUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |user, menu_item, quantity| {
                *user == TEST_USER_UUID && *menu_item == item && *quantity == 2
            })
            .return_once(move |_, _, _| Ok(make_cart(vec![make_cart_line(item, 10, 2)])));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item": item.into_uuid(), "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        let body: ApiResponse<CartResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message.as_deref(), Some("Item added to cart"));
        assert_eq!(body.data.map(|cart| cart.total_price), Some(20));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_defaults_to_one() -> TestResult {
        let item = MenuItemUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(|_, _, quantity| *quantity == 1)
            .return_once(move |_, _, _| Ok(make_cart(vec![make_cart_line(item, 10, 1)])));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item": item.into_uuid() }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item": MenuItemUuid::new().into_uuid(), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Invalid quantity provided");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_item_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::MenuItemNotFound));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item": MenuItemUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Item not found");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_from_another_restaurant_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::RestaurantMismatch));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item": MenuItemUuid::new().into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
