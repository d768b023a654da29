//! Restaurant Models

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Restaurant UUID
pub type RestaurantUuid = TypedUuid<Restaurant>;

/// Menu Item UUID
pub type MenuItemUuid = TypedUuid<MenuItem>;

/// Cuisine labels. Most restaurants list only a handful.
pub type Cuisines = SmallVec<[String; 3]>;

/// Restaurant Model
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub uuid: RestaurantUuid,
    pub name: String,
    pub location: String,
    pub owner: UserUuid,
    pub image: Option<String>,
    pub cuisines: Cuisines,
    pub rating: f64,
    pub menu: Vec<MenuItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Restaurant {
    #[must_use]
    pub fn is_owned_by(&self, user: UserUuid) -> bool {
        self.owner == user
    }
}

/// Menu Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub uuid: MenuItemUuid,
    pub restaurant: RestaurantUuid,
    pub name: String,
    pub price: u64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
