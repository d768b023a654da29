//! Catalog lookups
//!
//! Cart and order lines only hold menu item references plus cached copies of the
//! name and price. These types resolve those references against the live menus.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::domain::restaurants::models::{MenuItem, MenuItemUuid, RestaurantUuid};

/// A menu item as found in the catalog, before it has been checked for completeness.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub restaurant: RestaurantUuid,
    pub menu_item: MenuItemUuid,
    pub name: Option<String>,
    pub price: Option<u64>,
    pub image: Option<String>,
}

/// A menu item with everything a cart line needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMenuItem {
    pub restaurant: RestaurantUuid,
    pub menu_item: MenuItemUuid,
    pub name: String,
    pub price: u64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("menu item {0} is missing a name or price")]
pub struct IncompleteMenuItem(pub MenuItemUuid);

impl CatalogEntry {
    /// Blank names count as missing.
    pub fn resolve(self) -> Result<ResolvedMenuItem, IncompleteMenuItem> {
        let name = self.name.filter(|name| !name.trim().is_empty());

        let (Some(name), Some(price)) = (name, self.price) else {
            return Err(IncompleteMenuItem(self.menu_item));
        };

        Ok(ResolvedMenuItem {
            restaurant: self.restaurant,
            menu_item: self.menu_item,
            name,
            price,
            image: self.image,
        })
    }
}

/// Current name and price of a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDetails {
    pub name: String,
    pub price: u64,
}

/// `menu item -> (name, price)` built from one restaurant's current menu.
#[derive(Debug, Clone, Default)]
pub struct MenuLookup {
    entries: FxHashMap<MenuItemUuid, MenuDetails>,
}

impl MenuLookup {
    /// Index `menu`, keeping only the items listed in `wanted`.
    #[must_use]
    pub fn from_menu(menu: &[MenuItem], wanted: &[MenuItemUuid]) -> Self {
        let entries = menu
            .iter()
            .filter(|item| wanted.contains(&item.uuid))
            .map(|item| {
                (
                    item.uuid,
                    MenuDetails {
                        name: item.name.clone(),
                        price: item.price,
                    },
                )
            })
            .collect();

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, menu_item: MenuItemUuid) -> Option<&MenuDetails> {
        self.entries.get(&menu_item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
