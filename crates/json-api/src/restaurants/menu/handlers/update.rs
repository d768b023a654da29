//! Update Menu Item Handler

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

use feast_app::domain::{fields::FieldUpdate, restaurants::data::MenuItemUpdate};

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{errors::into_api_error, models::MenuItemResponse},
    state::State,
};

/// Update Menu Item Request
///
/// Omitted fields are left unchanged. Empty `description` or `image` clears them.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateMenuItemRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<u64>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl From<UpdateMenuItemRequest> for MenuItemUpdate {
    fn from(request: UpdateMenuItemRequest) -> Self {
        MenuItemUpdate {
            name: request.name,
            price: request.price,
            description: FieldUpdate::from_text(request.description),
            image: FieldUpdate::from_text(request.image),
        }
    }
}

/// Update Menu Item Handler
///
/// Carts keep the name and price cached when the item was added.
#[endpoint(
    tags("menu"),
    summary = "Update Menu Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant or menu item not found"),
    ),
)]
#[tracing::instrument(
    name = "menu.update",
    skip(restaurant, item, json, depot),
    fields(
        restaurant_uuid = tracing::field::Empty,
        menu_item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    item: PathParam<Uuid>,
    json: JsonBody<UpdateMenuItemRequest>,
    depot: &mut Depot,
) -> Result<ApiResponse<MenuItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let restaurant = restaurant.into_inner();
    let item = item.into_inner();

    let span = tracing::Span::current();

    span.record("restaurant_uuid", tracing::field::display(restaurant));
    span.record("menu_item_uuid", tracing::field::display(item));

    let updated = state
        .app
        .restaurants
        .update_menu_item(
            user.uuid,
            restaurant.into(),
            item.into(),
            json.into_inner().into(),
        )
        .await
        .map_err(|error| into_api_error(error, "Failed to update menu item"))?;

    tracing::info!(menu_item_uuid = %item, "updated menu item");

    Ok(ApiResponse::ok(updated.into()).with_message("Menu item updated successfully"))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use feast_app::domain::restaurants::{
        MockRestaurantsService, RestaurantsServiceError,
        models::{MenuItemUuid, RestaurantUuid},
    };

    use crate::test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_menu_item};

    use super::*;

    fn make_service(restaurants: MockRestaurantsService) -> Service {
        authenticated_service(
            StateBuilder::new().restaurants(restaurants),
            Router::with_path("restaurants/{restaurant}/menu/{item}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_menu_item_returns_200() -> TestResult {
        let restaurant_uuid = RestaurantUuid::new();
        let item_uuid = MenuItemUuid::new();
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_update_menu_item()
            .once()
            .withf(move |caller, restaurant, item, update| {
                *caller == TEST_USER_UUID
                    && *restaurant == restaurant_uuid
                    && *item == item_uuid
                    && *update
                        == MenuItemUpdate {
                            name: None,
                            price: Some(150),
                            description: FieldUpdate::Clear,
                            image: FieldUpdate::Keep,
                        }
            })
            .return_once(move |_, _, _, _| Ok(make_menu_item(restaurant_uuid, "Masala Dosa", 150)));

        let res = TestClient::put(format!(
            "http://example.com/restaurants/{restaurant_uuid}/menu/{item_uuid}"
        ))
        .json(&json!({ "price": 150, "description": "" }))
        .send(&make_service(restaurants))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_menu_item_returns_404() -> TestResult {
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_update_menu_item()
            .once()
            .return_once(|_, _, _, _| Err(RestaurantsServiceError::MenuItemNotFound));

        let res = TestClient::put(format!(
            "http://example.com/restaurants/{}/menu/{}",
            RestaurantUuid::new(),
            MenuItemUuid::new()
        ))
        .json(&json!({ "price": 150 }))
        .send(&make_service(restaurants))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
