//! Restaurant Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

/// Restaurant Orders Handler
///
/// Orders placed with a restaurant, newest first. Owner only.
#[endpoint(
    tags("orders"),
    summary = "List Restaurant Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant not found"),
    ),
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<ApiResponse<Vec<OrderResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    let orders = state
        .app
        .orders
        .list_restaurant_orders(user.uuid, restaurant.into_inner().into())
        .await
        .map_err(|error| into_api_error(error, "Failed to fetch orders"))?;

    Ok(ApiResponse::ok(orders.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use feast_app::domain::{
        orders::{MockOrdersService, OrdersServiceError},
        restaurants::models::RestaurantUuid,
    };

    use crate::test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        authenticated_service(
            StateBuilder::new().orders(orders),
            Router::with_path("restaurants/{restaurant}/orders").get(handler),
        )
    }

    #[tokio::test]
    async fn test_owner_lists_restaurant_orders() -> TestResult {
        let uuid = RestaurantUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_restaurant_orders()
            .once()
            .withf(move |caller, restaurant| *caller == TEST_USER_UUID && *restaurant == uuid)
            .return_once(|_, _| Ok(Vec::new()));

        let res = TestClient::get(format!("http://example.com/restaurants/{uuid}/orders"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_owner_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_restaurant_orders()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get(format!(
            "http://example.com/restaurants/{}/orders",
            RestaurantUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
