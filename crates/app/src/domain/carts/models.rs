//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::{
        restaurants::models::{MenuItemUuid, RestaurantUuid},
        users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Model
///
/// Every user has at most one cart. Its lines all come from `restaurant`, and
/// `total_price` is always derived from the lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user: UserUuid,
    pub restaurant: Option<RestaurantUuid>,
    pub lines: Vec<CartLine>,
    pub total_price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A menu item in a cart, with the name, price and image cached when it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub menu_item: MenuItemUuid,
    pub quantity: u32,
    pub name: Option<String>,
    pub price: u64,
    pub image: Option<String>,
}
