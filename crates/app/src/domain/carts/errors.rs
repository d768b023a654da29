//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::restaurants::{lookup::IncompleteMenuItem, models::MenuItemUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("item not found")]
    MenuItemNotFound,

    #[error("item not found in cart")]
    LineNotFound,

    #[error("invalid quantity provided")]
    InvalidQuantity,

    #[error("cart already holds items from another restaurant")]
    RestaurantMismatch,

    #[error("menu item {0} is missing a name or price")]
    IncompleteMenuItem(MenuItemUuid),

    #[error("unresolved cart line for menu item {0}")]
    UnresolvedLine(MenuItemUuid),

    #[error("cart total is too large")]
    TotalOverflow,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<IncompleteMenuItem> for CartsServiceError {
    fn from(error: IncompleteMenuItem) -> Self {
        Self::IncompleteMenuItem(error.0)
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
