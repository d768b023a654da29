//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use feast_app::domain::orders::data::CheckoutDetails;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    observability::record_order_placed,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    #[serde(default)]
    pub delivery_address: Option<String>,

    #[serde(default)]
    pub payment_method: Option<String>,
}

impl From<CheckoutRequest> for CheckoutDetails {
    fn from(request: CheckoutRequest) -> Self {
        CheckoutDetails {
            delivery_address: request.delivery_address,
            payment_method: request.payment_method,
        }
    }
}

/// Reads the optional checkout body. A missing body means no details were given.
async fn checkout_details(req: &mut Request) -> Result<CheckoutDetails, ApiError> {
    let payload = req
        .payload()
        .await
        .map_err(|error| ApiError::bad_request("Invalid checkout details").with_detail(error))?;

    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(CheckoutDetails::default());
    }

    req.parse_json::<CheckoutRequest>()
        .await
        .map(Into::into)
        .map_err(|error| ApiError::bad_request("Invalid checkout details").with_detail(error))
}

/// Checkout Handler
///
/// Turns the authenticated user's cart into a pending order priced from the current
/// menu, then deletes the cart. Nothing changes when checkout fails. The request body
/// is optional.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty or checkout details are malformed"),
        (status_code = StatusCode::NOT_FOUND, description = "No restaurant serves the cart items"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Cart references a deleted menu item"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(req, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        total_price = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<ApiResponse<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let details = checkout_details(req).await?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));

    let order = state
        .app
        .orders
        .create_order(user.uuid, details.into())
        .await
        .map_err(|error| into_api_error(error, "Failed to create order"))?;

    span.record("order_uuid", tracing::field::display(order.uuid));
    span.record("total_price", order.total_price);

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("Failed to set location header")?
        .status_code(StatusCode::CREATED);

    record_order_placed(order.total_price);

    tracing::info!(order_uuid = %order.uuid, total_price = order.total_price, "created order");

    Ok(ApiResponse::ok(order.into()).with_message("Order created successfully"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feast_app::domain::{
        orders::{
            MockOrdersService, OrdersServiceError,
            models::{OrderStatus, OrderUuid},
        },
        restaurants::models::MenuItemUuid,
    };

    use crate::{
        envelope::ErrorBody,
        test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_order},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        authenticated_service(
            StateBuilder::new().orders(orders),
            Router::with_path("orders").post(handler),
        )
    }

    #[tokio::test]
    async fn test_checkout_returns_201() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|user, details| {
                *user == TEST_USER_UUID
                    && *details
                        == CheckoutDetails {
                            delivery_address: Some("12 MG Road".to_string()),
                            payment_method: Some("cash".to_string()),
                        }
            })
            .return_once(move |_, _| Ok(make_order(uuid, OrderStatus::Pending)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({ "delivery_address": "12 MG Road", "payment_method": "cash" }))
            .send(&make_service(orders))
            .await;

        let body: ApiResponse<OrderResponse> = res.take_json().await?;
        let order = body.data.ok_or("missing data")?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(order.status, "pending");
        assert_eq!(order.total_price, 240);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_with_empty_details() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|_, details| *details == CheckoutDetails::default())
            .return_once(|_, _| Ok(make_order(OrderUuid::new(), OrderStatus::Pending)));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({}))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_without_body_returns_201() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|user, details| {
                *user == TEST_USER_UUID && *details == CheckoutDetails::default()
            })
            .return_once(|_, _| Ok(make_order(OrderUuid::new(), OrderStatus::Pending)));

        let mut res = TestClient::post("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        let body: ApiResponse<OrderResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert!(body.success, "bodyless checkout should succeed");
        assert_eq!(body.message.as_deref(), Some("Order created successfully"));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_with_malformed_body_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let mut res = TestClient::post("http://example.com/orders")
            .raw_json("{\"delivery_address\": ")
            .send(&make_service(orders))
            .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(!body.success, "malformed checkout must fail");
        assert_eq!(body.message, "Invalid checkout details");

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::CartEmpty));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({}))
            .send(&make_service(orders))
            .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Cart is empty");

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_with_deleted_menu_item_returns_500() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::MissingMenuItem(MenuItemUuid::new())));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({}))
            .send(&make_service(orders))
            .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(body.message, "Failed to create order");

        Ok(())
    }
}
