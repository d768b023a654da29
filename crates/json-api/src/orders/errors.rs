//! Order Errors

use tracing::error;

use feast_app::domain::orders::OrdersServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: OrdersServiceError, context: &str) -> ApiError {
    match error {
        OrdersServiceError::NotFound => ApiError::not_found("Order not found"),
        OrdersServiceError::CartEmpty => ApiError::bad_request("Cart is empty"),
        OrdersServiceError::RestaurantNotFound => {
            ApiError::not_found("Could not find restaurant for cart items.")
        }
        OrdersServiceError::Forbidden => ApiError::forbidden("Not authorized to access this order"),
        OrdersServiceError::InvalidStatus(ref status) => {
            ApiError::bad_request("Invalid order status").with_detail(format!(
                "{status:?} is not one of pending, preparing, out_for_delivery, delivered, cancelled"
            ))
        }
        OrdersServiceError::TotalOverflow
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            ApiError::bad_request("Invalid order payload").with_detail(error)
        }
        OrdersServiceError::MissingMenuItem(menu_item) => {
            error!(%menu_item, "cart references a menu item that no longer exists");

            ApiError::internal(context).with_detail(error)
        }
        OrdersServiceError::Sql(ref source) => {
            error!("{context}: {source}");

            ApiError::internal(context).with_detail(error)
        }
    }
}
