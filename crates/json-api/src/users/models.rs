//! User HTTP Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use feast_app::domain::users::models::User;

/// User Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    pub name: String,

    /// Lower-cased email address
    pub email: String,

    pub phone: String,

    pub address: Option<String>,

    /// One of `customer`, `restaurant_owner` or `admin`
    pub role: String,

    /// The date and time the user registered
    pub created_at: String,

    /// The date and time the profile was last updated
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            role: user.role.to_string(),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}
