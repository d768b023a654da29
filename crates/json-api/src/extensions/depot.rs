//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use feast_app::auth::AuthenticatedUser;

use crate::envelope::ApiError;

/// Helpers for reading request-scoped values out of the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_authenticated_user(&mut self, user: AuthenticatedUser);

    fn authenticated_user_or_401(&self) -> Result<AuthenticatedUser, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal("Internal server error"))
    }

    fn insert_authenticated_user(&mut self, user: AuthenticatedUser) {
        self.inject(user);
    }

    fn authenticated_user_or_401(&self) -> Result<AuthenticatedUser, ApiError> {
        self.obtain::<AuthenticatedUser>()
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Authentication required"))
    }
}
