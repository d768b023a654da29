//! Carts

pub mod errors;
pub mod models;
mod reconcile;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use reconcile::MAX_LINE_QUANTITY;
pub use service::*;
