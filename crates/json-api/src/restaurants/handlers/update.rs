//! Update Restaurant Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use feast_app::domain::{fields::FieldUpdate, restaurants::data::RestaurantUpdate};

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{errors::into_api_error, models::RestaurantResponse},
    state::State,
};

/// Update Restaurant Request
///
/// Omitted fields are left unchanged. An empty `image` clears it.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateRestaurantRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub cuisines: Option<SmallVec<[String; 3]>>,

    #[serde(default)]
    pub image: Option<String>,
}

impl From<UpdateRestaurantRequest> for RestaurantUpdate {
    fn from(request: UpdateRestaurantRequest) -> Self {
        RestaurantUpdate {
            name: request.name,
            location: request.location,
            cuisines: request.cuisines,
            image: FieldUpdate::from_text(request.image),
        }
    }
}

/// Update Restaurant Handler
#[endpoint(
    tags("restaurants"),
    summary = "Update Restaurant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller does not own the restaurant"),
        (status_code = StatusCode::NOT_FOUND, description = "Restaurant not found"),
    ),
)]
#[tracing::instrument(
    name = "restaurants.update",
    skip(restaurant, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        restaurant_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    restaurant: PathParam<Uuid>,
    json: JsonBody<UpdateRestaurantRequest>,
    depot: &mut Depot,
) -> Result<ApiResponse<RestaurantResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let restaurant = restaurant.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user.uuid));
    span.record("restaurant_uuid", tracing::field::display(restaurant));

    let updated = state
        .app
        .restaurants
        .update_restaurant(user.uuid, restaurant.into(), json.into_inner().into())
        .await
        .map_err(|error| into_api_error(error, "Failed to update restaurant"))?;

    tracing::info!(restaurant_uuid = %restaurant, "updated restaurant");

    Ok(ApiResponse::ok(updated.into()).with_message("Restaurant updated successfully"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use smallvec::smallvec;
    use testresult::TestResult;

    use feast_app::domain::restaurants::{
        MockRestaurantsService, RestaurantsServiceError, models::RestaurantUuid,
    };

    use crate::{
        envelope::ErrorBody,
        test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_restaurant},
    };

    use super::*;

    fn make_service(restaurants: MockRestaurantsService) -> Service {
        authenticated_service(
            StateBuilder::new().restaurants(restaurants),
            Router::with_path("restaurants/{restaurant}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_restaurant_returns_200() -> TestResult {
        let uuid = RestaurantUuid::new();
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_update_restaurant()
            .once()
            .withf(move |caller, restaurant, update| {
                *caller == TEST_USER_UUID
                    && *restaurant == uuid
                    && *update
                        == RestaurantUpdate {
                            name: None,
                            location: Some("Koramangala".to_string()),
                            cuisines: Some(smallvec!["Chettinad".to_string()]),
                            image: FieldUpdate::Keep,
                        }
            })
            .return_once(move |owner, _, _| Ok(make_restaurant(uuid, owner)));

        let res = TestClient::put(format!("http://example.com/restaurants/{uuid}"))
            .json(&json!({ "location": "Koramangala", "cuisines": ["Chettinad"] }))
            .send(&make_service(restaurants))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_by_non_owner_returns_403() -> TestResult {
        let mut restaurants = MockRestaurantsService::new();

        restaurants
            .expect_update_restaurant()
            .once()
            .return_once(|_, _, _| Err(RestaurantsServiceError::Forbidden));

        let mut res = TestClient::put(format!(
            "http://example.com/restaurants/{}",
            RestaurantUuid::new()
        ))
        .json(&json!({ "name": "Mine Now" }))
        .send(&make_service(restaurants))
        .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.message, "Not authorized to manage this restaurant");

        Ok(())
    }
}
