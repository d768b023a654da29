//! User Errors

use tracing::error;

use feast_app::domain::users::UsersServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: UsersServiceError, context: &str) -> ApiError {
    match error {
        UsersServiceError::NotFound => ApiError::not_found("User not found"),
        UsersServiceError::AlreadyExists => {
            ApiError::conflict("User already exists").with_detail(error)
        }
        UsersServiceError::InvalidName
        | UsersServiceError::InvalidEmail
        | UsersServiceError::InvalidPhone => ApiError::bad_request(error.to_string()),
        UsersServiceError::MissingRequiredData | UsersServiceError::InvalidData => {
            ApiError::bad_request("Invalid user payload").with_detail(error)
        }
        UsersServiceError::Sql(ref source) => {
            error!("{context}: {source}");

            ApiError::internal(context).with_detail(error)
        }
    }
}
