//! Update Order Status Handler

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

use feast_app::domain::orders::OrdersServiceError;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    observability::record_order_status_change,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// One of `pending`, `preparing`, `out_for_delivery`, `delivered` or `cancelled`
    pub status: String,
}

/// Update Order Status Handler
///
/// Only the owner of the order's restaurant may change its status.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order status"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(order, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        status = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<ApiResponse<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let order = order.into_inner();
    let status = json.into_inner().status;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("order_uuid", tracing::field::display(order));
    span.record("status", status.as_str());

    let updated = state
        .app
        .orders
        .update_status(user.uuid, order.into(), status)
        .await
        .map_err(|error| match error {
            OrdersServiceError::Forbidden => {
                ApiError::forbidden("Not authorized to update this order")
            }
            error => into_api_error(error, "Failed to update order status"),
        })?;

    record_order_status_change(updated.status.as_str());

    tracing::info!(order_uuid = %order, status = %updated.status, "updated order status");

    Ok(ApiResponse::ok(updated.into()).with_message("Order status updated successfully"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feast_app::domain::orders::{
        MockOrdersService,
        models::{OrderStatus, OrderUuid},
    };

    use crate::{
        envelope::ErrorBody,
        test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_order},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        authenticated_service(
            StateBuilder::new().orders(orders),
            Router::with_path("orders/{order}/status").put(handler),
        )
    }

    #[tokio::test]
    async fn test_owner_updates_status() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_status()
            .once()
            .withf(move |caller, order, status| {
                *caller == TEST_USER_UUID && *order == uuid && status == "out_for_delivery"
            })
            .return_once(move |_, _, _| Ok(make_order(uuid, OrderStatus::OutForDelivery)));

        let mut res = TestClient::put(format!("http://example.com/orders/{uuid}/status"))
            .json(&json!({ "status": "out_for_delivery" }))
            .send(&make_service(orders))
            .await;

        let body: ApiResponse<OrderResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.data.map(|order| order.status),
            Some("out_for_delivery".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_non_owner_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_status()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::Forbidden));

        let mut res = TestClient::put(format!(
            "http://example.com/orders/{}/status",
            OrderUuid::new()
        ))
        .json(&json!({ "status": "delivered" }))
        .send(&make_service(orders))
        .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.message, "Not authorized to update this order");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_status()
            .once()
            .return_once(|_, _, status| Err(OrdersServiceError::InvalidStatus(status)));

        let mut res = TestClient::put(format!(
            "http://example.com/orders/{}/status",
            OrderUuid::new()
        ))
        .json(&json!({ "status": "shipped" }))
        .send(&make_service(orders))
        .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Invalid order status");

        Ok(())
    }
}
