//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::users::{
        data::{NewUser, UserUpdate, normalize_email, normalize_name, validate_phone},
        errors::UsersServiceError,
        models::{User, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let user = user.normalized()?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, &user).await?;

        tx.commit().await?;

        info!(user = %created.uuid, role = %created.role, "created user");

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, UsersServiceError> {
        let email = normalize_email(email)?;

        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user_by_email(&mut tx, &email).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<User, UsersServiceError> {
        let name = update.name.as_deref().map(normalize_name).transpose()?;
        let phone = update.phone.map(validate_phone).transpose()?;

        let mut tx = self.db.begin().await?;

        let mut current = self.repository.get_user_for_update(&mut tx, user).await?;

        if let Some(name) = name {
            current.name = name;
        }

        if let Some(phone) = phone {
            current.phone = phone;
        }

        current.address = update
            .address
            .apply(current.address)
            .map(|address| address.trim().to_string());

        let updated = self.repository.update_user(&mut tx, &current).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Register a user. Emails are stored lower-cased and must be unique.
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Retrieve a user profile.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Look a user up by email, compared case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> Result<User, UsersServiceError>;

    /// Apply a partial profile update.
    async fn update_user(&self, user: UserUuid, update: UserUpdate)
    -> Result<User, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{fields::FieldUpdate, users::models::UserRole},
        test::TestContext,
    };

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            uuid: UserUuid::new(),
            name: "Asha".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            address: Some("12 MG Road".to_string()),
            role: UserRole::Customer,
        }
    }

    #[tokio::test]
    async fn create_user_stores_lower_cased_email() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.create_user(new_user("Asha@Example.com")).await?;

        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.role, UserRole::Customer);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("dup@example.com")).await?;

        let result = ctx.users.create_user(new_user("DUP@example.com")).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_user_applies_partial_changes() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.create_user(new_user("partial@example.com")).await?;

        let updated = ctx
            .users
            .update_user(
                user.uuid,
                UserUpdate {
                    name: Some("Asha K".to_string()),
                    phone: None,
                    address: FieldUpdate::Clear,
                },
            )
            .await?;

        assert_eq!(updated.name, "Asha K");
        assert_eq!(updated.phone, user.phone);
        assert_eq!(updated.address, None);

        Ok(())
    }

    #[tokio::test]
    async fn find_user_by_email_ignores_case() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.create_user(new_user("lookup@example.com")).await?;

        let found = ctx.users.find_user_by_email(" LookUp@Example.com ").await?;

        assert_eq!(found.uuid, user.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
