//! Restaurants

pub(crate) mod errors;
mod handlers;
pub(crate) mod menu;
pub(crate) mod models;

pub(crate) use handlers::*;
