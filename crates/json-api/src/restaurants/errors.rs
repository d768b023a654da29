//! Restaurant Errors

use tracing::error;

use feast_app::domain::restaurants::RestaurantsServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: RestaurantsServiceError, context: &str) -> ApiError {
    match error {
        RestaurantsServiceError::NotFound => ApiError::not_found("Restaurant not found"),
        RestaurantsServiceError::MenuItemNotFound => ApiError::not_found("Menu item not found"),
        RestaurantsServiceError::Forbidden => {
            ApiError::forbidden("Not authorized to manage this restaurant")
        }
        RestaurantsServiceError::AlreadyExists | RestaurantsServiceError::HasOrders => {
            ApiError::conflict(error.to_string())
        }
        RestaurantsServiceError::InvalidName
        | RestaurantsServiceError::InvalidLocation
        | RestaurantsServiceError::InvalidRating
        | RestaurantsServiceError::InvalidMenuItemName
        | RestaurantsServiceError::InvalidPrice(_) => ApiError::bad_request(error.to_string()),
        RestaurantsServiceError::InvalidReference
        | RestaurantsServiceError::MissingRequiredData
        | RestaurantsServiceError::InvalidData => {
            ApiError::bad_request("Invalid restaurant payload").with_detail(error)
        }
        RestaurantsServiceError::Sql(ref source) => {
            error!("{context}: {source}");

            ApiError::internal(context).with_detail(error)
        }
    }
}
