//! Create Menu Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use feast_app::domain::restaurants::data::NewMenuItem;

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{
        errors::into_api_error,
        models::{MenuItemResponse, NewMenuItemRequest},
    },
    state::State,
};

/// Create Menu Item Handler
///
/// Appends an item to the end of the menu.
#[endpoint(
    tags("menu"),
    summary = "Add Menu Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Menu item created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant not found"),
    ),
)]
#[tracing::instrument(
    name = "menu.create",
    skip(restaurant, json, depot, res),
    fields(
        restaurant_uuid = tracing::field::Empty,
        menu_item_uuid = tracing::field::Empty,
        price = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    json: JsonBody<NewMenuItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<ApiResponse<MenuItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let restaurant = restaurant.into_inner();
    let item: NewMenuItem = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("restaurant_uuid", tracing::field::display(restaurant));
    span.record("menu_item_uuid", tracing::field::display(item.uuid));
    span.record("price", item.price);

    let item = state
        .app
        .restaurants
        .add_menu_item(user.uuid, restaurant.into(), item)
        .await
        .map_err(|error| into_api_error(error, "Failed to add menu item"))?;

    res.add_header(
        LOCATION,
        format!("/restaurants/{restaurant}/menu/{}", item.uuid),
        true,
    )
    .or_500("Failed to set location header")?
    .status_code(StatusCode::CREATED);

    tracing::info!(menu_item_uuid = %item.uuid, "added menu item");

    Ok(ApiResponse::ok(item.into()).with_message("Menu item added successfully"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feast_app::domain::restaurants::{
        MockRestaurantsService, RestaurantsServiceError, models::RestaurantUuid,
    };

    use crate::test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_menu_item};

    use super::*;

    fn make_service(restaurants: MockRestaurantsService) -> Service {
        authenticated_service(
            StateBuilder::new().restaurants(restaurants),
            Router::with_path("restaurants/{restaurant}/menu").post(handler),
        )
    }

    #[tokio::test]
    async fn test_add_menu_item_returns_201() -> TestResult {
        let uuid = RestaurantUuid::new();
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_add_menu_item()
            .once()
            .withf(move |caller, restaurant, item| {
                *caller == TEST_USER_UUID
                    && *restaurant == uuid
                    && item.name == "Filter Coffee"
                    && item.price == 40
                    && item.description.as_deref() == Some("Strong")
            })
            .return_once(move |_, _, _| Ok(make_menu_item(uuid, "Filter Coffee", 40)));

        let mut res = TestClient::post(format!("http://example.com/restaurants/{uuid}/menu"))
            .json(&json!({ "name": "Filter Coffee", "price": 40, "description": "Strong" }))
            .send(&make_service(restaurants))
            .await;

        let body: ApiResponse<MenuItemResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.data.map(|item| item.price), Some(40));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_menu_item_to_foreign_restaurant_returns_403() -> TestResult {
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_add_menu_item()
            .once()
            .return_once(|_, _, _| Err(RestaurantsServiceError::Forbidden));

        let res = TestClient::post(format!(
            "http://example.com/restaurants/{}/menu",
            RestaurantUuid::new()
        ))
        .json(&json!({ "name": "Filter Coffee", "price": 40 }))
        .send(&make_service(restaurants))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
