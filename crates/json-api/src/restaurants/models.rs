//! Restaurant HTTP Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feast_app::domain::restaurants::{
    data::NewMenuItem,
    models::{MenuItem, MenuItemUuid, Restaurant},
};

/// Restaurant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RestaurantResponse {
    /// The unique identifier of the restaurant
    pub uuid: Uuid,

    pub name: String,

    pub location: String,

    /// The user who owns the restaurant
    pub owner: Uuid,

    pub image: Option<String>,

    pub cuisines: Vec<String>,

    /// Average rating between 0 and 5
    pub rating: f64,

    /// Menu items in display order
    pub menu: Vec<MenuItemResponse>,

    /// The date and time the restaurant was created
    pub created_at: String,

    /// The date and time the restaurant was last updated
    pub updated_at: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            uuid: restaurant.uuid.into_uuid(),
            name: restaurant.name,
            location: restaurant.location,
            owner: restaurant.owner.into_uuid(),
            image: restaurant.image,
            cuisines: restaurant.cuisines.into_vec(),
            rating: restaurant.rating,
            menu: restaurant.menu.into_iter().map(Into::into).collect(),
            created_at: restaurant.created_at.to_string(),
            updated_at: restaurant.updated_at.to_string(),
        }
    }
}

/// Menu Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MenuItemResponse {
    /// The unique identifier of the menu item
    pub uuid: Uuid,

    /// The restaurant serving the item
    pub restaurant: Uuid,

    pub name: String,

    /// Price in the smallest currency unit
    pub price: u64,

    pub description: Option<String>,

    pub image: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            restaurant: item.restaurant.into_uuid(),
            name: item.name,
            price: item.price,
            description: item.description,
            image: item.image,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// New Menu Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NewMenuItemRequest {
    pub name: String,

    /// Price in the smallest currency unit
    pub price: u64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl From<NewMenuItemRequest> for NewMenuItem {
    fn from(request: NewMenuItemRequest) -> Self {
        NewMenuItem {
            uuid: MenuItemUuid::new(),
            name: request.name,
            price: request.price,
            description: request.description,
            image: request.image,
        }
    }
}
