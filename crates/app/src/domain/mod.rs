//! Feast Domain Concerns

mod amounts;
pub mod carts;
pub mod fields;
pub mod orders;
pub mod restaurants;
pub mod users;
