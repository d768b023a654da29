//! Checkout
//!
//! Turning a cart into order lines. Names and prices come from the restaurant's
//! current menu, never from the values cached on the cart.

use crate::domain::{
    carts::models::CartLine,
    orders::{errors::OrdersServiceError, models::OrderLine},
    restaurants::lookup::MenuLookup,
};

/// Map every cart line to an order line. A line whose menu item is missing from
/// `lookup` fails the whole checkout.
pub fn build_order_lines(
    lines: &[CartLine],
    lookup: &MenuLookup,
) -> Result<Vec<OrderLine>, OrdersServiceError> {
    lines
        .iter()
        .map(|line| -> Result<OrderLine, OrdersServiceError> {
            let details = lookup
                .get(line.menu_item)
                .ok_or(OrdersServiceError::MissingMenuItem(line.menu_item))?;

            Ok(OrderLine {
                menu_item: line.menu_item,
                name: details.name.clone(),
                price: details.price,
                quantity: line.quantity,
            })
        })
        .collect()
}

/// Sum of price times quantity.
pub fn order_total(lines: &[OrderLine]) -> Result<u64, OrdersServiceError> {
    lines
        .iter()
        .try_fold(0_u64, |total, line| {
            line.price
                .checked_mul(u64::from(line.quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
        })
        .ok_or(OrdersServiceError::TotalOverflow)
}
