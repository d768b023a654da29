//! Create Restaurant Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use feast_app::domain::restaurants::{data::NewRestaurant, models::RestaurantUuid};

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    restaurants::{
        errors::into_api_error,
        models::{NewMenuItemRequest, RestaurantResponse},
    },
    state::State,
};

/// Create Restaurant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateRestaurantRequest {
    pub name: String,

    pub location: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub cuisines: SmallVec<[String; 3]>,

    /// Initial menu, in display order
    #[serde(default)]
    pub menu: Vec<NewMenuItemRequest>,
}

impl From<CreateRestaurantRequest> for NewRestaurant {
    fn from(request: CreateRestaurantRequest) -> Self {
        NewRestaurant {
            uuid: RestaurantUuid::new(),
            name: request.name,
            location: request.location,
            image: request.image,
            cuisines: request.cuisines,
            menu: request.menu.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create Restaurant Handler
///
/// The caller becomes the restaurant's owner.
#[endpoint(
    tags("restaurants"),
    summary = "Create Restaurant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Restaurant created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "restaurants.create",
    skip(json, depot, res),
    fields(
        owner_uuid = tracing::field::Empty,
        restaurant_uuid = tracing::field::Empty,
        menu_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateRestaurantRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<ApiResponse<RestaurantResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;
    let restaurant: NewRestaurant = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("owner_uuid", tracing::field::display(user.uuid));
    span.record("restaurant_uuid", tracing::field::display(restaurant.uuid));
    span.record("menu_count", restaurant.menu.len());

    let restaurant = state
        .app
        .restaurants
        .create_restaurant(user.uuid, restaurant)
        .await
        .map_err(|error| into_api_error(error, "Failed to create restaurant"))?;

    res.add_header(LOCATION, format!("/restaurants/{}", restaurant.uuid), true)
        .or_500("Failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(restaurant_uuid = %restaurant.uuid, "created restaurant");

    Ok(ApiResponse::ok(restaurant.into()).with_message("Restaurant created successfully"))
}
