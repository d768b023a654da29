//! Update Profile Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use feast_app::domain::{fields::FieldUpdate, users::data::UserUpdate};

use crate::{
    envelope::{ApiError, ApiResponse},
    extensions::*,
    state::State,
    users::{errors::into_api_error, models::UserResponse},
};

/// Update Profile Request
///
/// Omitted fields are left unchanged. An empty `address` clears it.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub address: Option<String>,
}

impl From<UpdateProfileRequest> for UserUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        UserUpdate {
            name: request.name,
            phone: request.phone,
            address: FieldUpdate::from_text(request.address),
        }
    }
}

/// Update Profile Handler
#[endpoint(
    tags("users"),
    summary = "Update Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid name or phone"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
#[tracing::instrument(
    name = "users.update",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.authenticated_user_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

    let profile = state
        .app
        .users
        .update_user(user.uuid, json.into_inner().into())
        .await
        .map_err(|error| into_api_error(error, "Failed to update profile"))?;

    tracing::info!(user_uuid = %user.uuid, "updated profile");

    Ok(ApiResponse::ok(profile.into()).with_message("Profile updated successfully"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use feast_app::domain::users::{MockUsersService, UsersServiceError};

    use crate::{
        envelope::ErrorBody,
        test_helpers::{StateBuilder, TEST_USER_UUID, authenticated_service, make_user},
    };

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        authenticated_service(
            StateBuilder::new().users(users),
            Router::with_path("users/me").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_profile_returns_200() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_update_user()
            .once()
            .withf(|user, update| {
                *user == TEST_USER_UUID
                    && *update
                        == UserUpdate {
                            name: Some("Asha R".to_string()),
                            phone: None,
                            address: FieldUpdate::Clear,
                        }
            })
            .return_once(|user, _| {
                let mut profile = make_user(user);

                profile.name = "Asha R".to_string();

                Ok(profile)
            });

        let mut res = TestClient::put("http://example.com/users/me")
            .json(&json!({ "name": "Asha R", "address": "" }))
            .send(&make_service(users))
            .await;

        let body: ApiResponse<UserResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message.as_deref(), Some("Profile updated successfully"));
        assert_eq!(body.data.map(|user| user.name), Some("Asha R".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_invalid_phone_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_update_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::InvalidPhone));

        let mut res = TestClient::put("http://example.com/users/me")
            .json(&json!({ "phone": "123" }))
            .send(&make_service(users))
            .await;

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(!body.success, "validation failures are unsuccessful");
        assert_eq!(body.message, "phone number must contain 10 digits");

        Ok(())
    }
}
