//! Order HTTP Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feast_app::domain::orders::models::{Order, OrderLine};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The customer who placed the order
    pub user: Uuid,

    pub restaurant: Uuid,

    /// Lines priced from the menu at checkout
    pub items: Vec<OrderLineResponse>,

    pub total_price: u64,

    /// One of `pending`, `preparing`, `out_for_delivery`, `delivered` or `cancelled`
    pub status: String,

    pub delivery_address: Option<String>,

    pub payment_method: Option<String>,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            user: order.user.into_uuid(),
            restaurant: order.restaurant.into_uuid(),
            items: order.lines.into_iter().map(Into::into).collect(),
            total_price: order.total_price,
            status: order.status.to_string(),
            delivery_address: order.delivery_address,
            payment_method: order.payment_method,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub item: Uuid,

    pub name: String,

    pub price: u64,

    pub quantity: u32,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            item: line.menu_item.into_uuid(),
            name: line.name,
            price: line.price,
            quantity: line.quantity,
        }
    }
}
