//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenVersion, AuthServiceError, AuthenticatedUser, IssuedApiToken,
        format_api_token, generate_api_token_secret, hash_api_token, parse_api_token,
        repository::PgAuthRepository,
    },
    domain::users::models::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let token = self
            .repository
            .find_active_api_token(parsed_token.token_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let token_hash = hash_api_token(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.user_uuid,
            &parsed_token.secret,
        );

        if token_hash != token.token_hash {
            warn!(token = %parsed_token.token_uuid, "bearer token secret mismatch");

            return Err(AuthServiceError::NotFound);
        }

        // Auth success does not depend on this write.
        if let Err(error) = self.repository.touch_api_token(parsed_token.token_uuid).await {
            warn!(%error, "failed to record api token use");
        }

        Ok(AuthenticatedUser {
            uuid: token.user_uuid,
            role: token.role,
        })
    }

    async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);
        let token_hash = hash_api_token(&token_uuid, version, &user, &secret);

        let metadata = self
            .repository
            .create_api_token(token_uuid, user, &token_hash)
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the user it was issued for.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError>;

    /// Issue a new API token for `user`. The raw token is only ever returned here.
    async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError>;
}
