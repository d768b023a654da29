//! User Handlers

pub(crate) mod get;
pub(crate) mod restaurants;
pub(crate) mod update;
