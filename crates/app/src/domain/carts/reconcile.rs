//! Cart reconciliation
//!
//! In-memory mutations of a [`Cart`]. The service loads and locks the cart, applies
//! one of these, and writes the result back in the same transaction.

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::domain::{
    carts::{
        errors::CartsServiceError,
        models::{Cart, CartLine, CartUuid},
    },
    restaurants::{lookup::ResolvedMenuItem, models::MenuItemUuid},
    users::models::UserUuid,
};

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

impl Cart {
    /// A cart that has not been stored yet.
    #[must_use]
    pub fn empty(user: UserUuid) -> Self {
        let now = Timestamp::now();

        Self {
            uuid: CartUuid::new(),
            user,
            restaurant: None,
            lines: Vec::new(),
            total_price: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Menu items referenced by the cart, in line order.
    #[must_use]
    pub fn menu_items(&self) -> Vec<MenuItemUuid> {
        self.lines.iter().map(|line| line.menu_item).collect()
    }

    /// Menu items whose line has no cached name.
    #[must_use]
    pub fn lines_missing_name(&self) -> Vec<MenuItemUuid> {
        self.lines
            .iter()
            .filter(|line| line.name.is_none())
            .map(|line| line.menu_item)
            .collect()
    }

    /// Fill in missing names from `names`. Returns how many lines were filled.
    pub fn backfill_names(&mut self, names: &FxHashMap<MenuItemUuid, String>) -> usize {
        let mut filled = 0;

        for line in self.lines.iter_mut().filter(|line| line.name.is_none()) {
            if let Some(name) = names.get(&line.menu_item) {
                line.name = Some(name.clone());
                filled += 1;
            }
        }

        filled
    }

    /// Add `quantity` of `item`, merging with an existing line for the same item.
    ///
    /// A merged line keeps the price it was first added at but picks up the current
    /// name.
    pub fn add_line(
        &mut self,
        item: &ResolvedMenuItem,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        if quantity == 0 || quantity > MAX_LINE_QUANTITY {
            return Err(CartsServiceError::InvalidQuantity);
        }

        // A cart with lines but no restaurant outlived its restaurant's deletion.
        match self.restaurant {
            _ if self.lines.is_empty() => self.restaurant = Some(item.restaurant),
            Some(restaurant) if restaurant == item.restaurant => {}
            _ => return Err(CartsServiceError::RestaurantMismatch),
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.menu_item == item.menu_item)
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .filter(|total| *total <= MAX_LINE_QUANTITY)
                .ok_or(CartsServiceError::InvalidQuantity)?;

            line.name = Some(item.name.clone());
        } else {
            self.lines.push(CartLine {
                menu_item: item.menu_item,
                quantity,
                name: Some(item.name.clone()),
                price: item.price,
                image: item.image.clone(),
            });
        }

        Ok(())
    }

    /// Drop the line for `item`. Removing an absent line is a no-op; returns whether a
    /// line was removed.
    pub fn remove_line(&mut self, item: MenuItemUuid) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.menu_item != item);

        if self.lines.is_empty() {
            self.restaurant = None;
        }

        self.lines.len() != before
    }

    /// Overwrite a line's quantity. Zero removes the line.
    pub fn set_quantity(
        &mut self,
        item: MenuItemUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.menu_item == item)
            .ok_or(CartsServiceError::LineNotFound)?;

        if quantity == 0 {
            self.remove_line(item);
        } else {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Recompute `total_price` as the sum of price times quantity over all lines.
    pub fn recompute_total(&mut self) -> Result<u64, CartsServiceError> {
        let total = self.lines.iter().try_fold(0_u64, |total, line| {
            line.price
                .checked_mul(u64::from(line.quantity))
                .and_then(|subtotal| total.checked_add(subtotal))
        });

        self.total_price = total.ok_or(CartsServiceError::TotalOverflow)?;

        Ok(self.total_price)
    }

    /// Every line must carry a name before the cart can be stored.
    pub fn ensure_lines_resolved(&self) -> Result<(), CartsServiceError> {
        match self.lines.iter().find(|line| line.name.is_none()) {
            Some(line) => Err(CartsServiceError::UnresolvedLine(line.menu_item)),
            None => Ok(()),
        }
    }
}
