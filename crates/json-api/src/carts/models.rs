//! Cart HTTP Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feast_app::domain::carts::{
    MAX_LINE_QUANTITY,
    models::{Cart, CartLine},
};

use crate::envelope::ApiError;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The restaurant every line belongs to, unset while the cart is empty
    pub restaurant: Option<Uuid>,

    /// The lines in the cart, in the order they were added
    pub items: Vec<CartLineResponse>,

    /// Sum of price times quantity over all lines
    pub total_price: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            uuid: cart.uuid.into_uuid(),
            restaurant: cart.restaurant.map(Into::into),
            items: cart.lines.into_iter().map(Into::into).collect(),
            total_price: cart.total_price,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The menu item this line holds
    pub item: Uuid,

    /// Name cached when the item was added
    pub name: Option<String>,

    /// Unit price cached when the item was added
    pub price: u64,

    pub quantity: u32,

    pub image: Option<String>,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            item: line.menu_item.into_uuid(),
            name: line.name,
            price: line.price,
            quantity: line.quantity,
            image: line.image,
        }
    }
}

/// Narrow a requested quantity to a line quantity no smaller than `minimum`.
pub(crate) fn line_quantity(requested: i64, minimum: u32) -> Result<u32, ApiError> {
    u32::try_from(requested)
        .ok()
        .filter(|quantity| (minimum..=MAX_LINE_QUANTITY).contains(quantity))
        .ok_or_else(|| ApiError::bad_request("Invalid quantity provided"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_quantities_are_rejected() {
        assert!(line_quantity(-1, 0).is_err(), "negative quantity must fail");
        assert!(line_quantity(0, 1).is_err(), "zero is below the add minimum");
        assert_eq!(line_quantity(0, 0).ok(), Some(0));
        assert_eq!(line_quantity(3, 1).ok(), Some(3));
    }

    #[test]
    fn oversized_quantities_are_rejected() {
        assert!(
            line_quantity(i64::from(MAX_LINE_QUANTITY) + 1, 1).is_err(),
            "quantities above the line maximum must fail"
        );
    }
}
