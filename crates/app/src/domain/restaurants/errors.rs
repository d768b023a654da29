//! Restaurants service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestaurantsServiceError {
    #[error("restaurant already exists")]
    AlreadyExists,

    #[error("restaurant not found")]
    NotFound,

    #[error("menu item not found")]
    MenuItemNotFound,

    #[error("not authorized to manage this restaurant")]
    Forbidden,

    #[error("restaurant has orders and cannot be deleted")]
    HasOrders,

    #[error("restaurant name is required")]
    InvalidName,

    #[error("location is required")]
    InvalidLocation,

    #[error("rating must be between 0 and 5")]
    InvalidRating,

    #[error("menu item name is required")]
    InvalidMenuItemName,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("invalid price value")]
    InvalidPrice(#[from] TryFromIntError),
}

impl From<Error> for RestaurantsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
