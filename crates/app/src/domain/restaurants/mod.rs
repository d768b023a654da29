//! Restaurants and their menus

pub mod data;
pub mod errors;
pub mod lookup;
pub mod models;
pub(crate) mod repositories;
pub mod service;

pub use errors::RestaurantsServiceError;
pub use service::*;
