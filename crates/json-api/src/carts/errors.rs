//! Cart Errors

use tracing::error;

use feast_app::domain::carts::CartsServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError, context: &str) -> ApiError {
    match error {
        CartsServiceError::NotFound => ApiError::not_found("Cart not found"),
        CartsServiceError::MenuItemNotFound => ApiError::not_found("Item not found"),
        CartsServiceError::LineNotFound => ApiError::not_found("Item not found in cart"),
        CartsServiceError::InvalidQuantity => ApiError::bad_request("Invalid quantity provided"),
        CartsServiceError::RestaurantMismatch => ApiError::conflict(
            "Cart already holds items from another restaurant. Clear it before adding this item.",
        ),
        CartsServiceError::TotalOverflow
        | CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            ApiError::bad_request("Invalid cart payload").with_detail(error)
        }
        CartsServiceError::IncompleteMenuItem(menu_item) => {
            error!(%menu_item, "menu item is missing a name or price");

            ApiError::internal("Internal error processing item details.").with_detail(error)
        }
        CartsServiceError::UnresolvedLine(menu_item) => {
            error!(%menu_item, "cart line could not be resolved");

            ApiError::internal(context).with_detail(error)
        }
        CartsServiceError::Sql(ref source) => {
            error!("{context}: {source}");

            ApiError::internal(context).with_detail(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use feast_app::domain::restaurants::models::MenuItemUuid;

    use super::*;

    #[test]
    fn cross_restaurant_add_is_a_conflict() {
        let error = into_api_error(CartsServiceError::RestaurantMismatch, "Failed to add");

        assert_eq!(error.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn integrity_failures_are_internal() {
        for error in [
            CartsServiceError::IncompleteMenuItem(MenuItemUuid::new()),
            CartsServiceError::UnresolvedLine(MenuItemUuid::new()),
        ] {
            assert_eq!(
                into_api_error(error, "Failed to add item to cart").status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
