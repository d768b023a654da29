//! Restaurant Repositories

mod catalog;
mod menu_items;
mod restaurants;

pub(crate) use catalog::PgCatalogRepository;
pub(crate) use menu_items::PgMenuItemsRepository;
pub(crate) use restaurants::PgRestaurantsRepository;
