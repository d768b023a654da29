//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        restaurants::models::{MenuItemUuid, RestaurantUuid},
        users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
///
/// A snapshot of a cart at checkout. Only `status` changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub restaurant: RestaurantUuid,
    pub lines: Vec<OrderLine>,
    pub total_price: u64,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Line Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub menu_item: MenuItemUuid,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

/// Order lifecycle: `pending -> preparing -> out_for_delivery -> delivered`, or
/// `cancelled`. Any status may be set from any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| InvalidOrderStatus(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_parses_from_its_name() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_and_differently_cased_statuses_are_rejected() {
        for value in ["shipped", "Pending", "out-for-delivery", ""] {
            assert!(value.parse::<OrderStatus>().is_err(), "{value:?} should not parse");
        }
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        let terminal: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|status| status.is_terminal())
            .collect();

        assert_eq!(terminal, [OrderStatus::Delivered, OrderStatus::Cancelled]);
    }
}
