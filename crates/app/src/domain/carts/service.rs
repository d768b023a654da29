//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::Cart,
            repositories::{PgCartLinesRepository, PgCartsRepository},
        },
        restaurants::{models::MenuItemUuid, repositories::PgCatalogRepository},
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }

    async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, CartsServiceError> {
        let Some(mut cart) = self.carts_repository.get_cart(tx, user).await? else {
            return Ok(None);
        };

        cart.lines = self.lines_repository.get_cart_lines(tx, cart.uuid).await?;

        Ok(Some(cart))
    }

    async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, CartsServiceError> {
        let Some(mut cart) = self.carts_repository.get_cart_for_update(tx, user).await? else {
            return Ok(None);
        };

        cart.lines = self.lines_repository.get_cart_lines(tx, cart.uuid).await?;

        Ok(Some(cart))
    }

    async fn save_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &mut Cart,
    ) -> Result<(), CartsServiceError> {
        cart.updated_at = self.carts_repository.update_cart(tx, cart).await?;

        self.lines_repository
            .replace_cart_lines(tx, cart.uuid, &cart.lines)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .find_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, user, item),
        fields(user = %user, menu_item = %item),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: MenuItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let resolved = self
            .catalog_repository
            .find_menu_item(&mut tx, item)
            .await?
            .ok_or(CartsServiceError::MenuItemNotFound)?
            .resolve()?;

        self.carts_repository.ensure_cart(&mut tx, user).await?;

        let mut cart = self
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let missing = cart.lines_missing_name();

        if !missing.is_empty() {
            let names = self
                .catalog_repository
                .find_menu_item_names(&mut tx, &missing)
                .await?;

            let filled = cart.backfill_names(&names);

            debug!(missing = missing.len(), filled, "backfilled cart line names");

            if filled < missing.len() {
                warn!(
                    cart = %cart.uuid,
                    unresolved = missing.len() - filled,
                    "cart holds lines whose menu items no longer exist"
                );
            }
        }

        cart.add_line(&resolved, quantity)?;
        cart.recompute_total()?;
        cart.ensure_lines_resolved()?;

        self.save_cart(&mut tx, &mut cart).await?;

        tx.commit().await?;

        info!(cart = %cart.uuid, total_price = cart.total_price, "added item to cart");

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        item: MenuItemUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        cart.remove_line(item);
        cart.recompute_total()?;

        self.save_cart(&mut tx, &mut cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_quantity(
        &self,
        user: UserUuid,
        item: MenuItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        cart.set_quantity(item, quantity)?;
        cart.recompute_total()?;

        self.save_cart(&mut tx, &mut cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.carts_repository.delete_cart(&mut tx, user).await?;

        tx.commit().await?;

        debug!(user = %user, cleared = rows_affected > 0, "cleared cart");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart exactly as stored.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a menu item to the user's cart, creating the cart on first use.
    async fn add_item(
        &self,
        user: UserUuid,
        item: MenuItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a menu item's line. Removing an absent line leaves the cart unchanged.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: MenuItemUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Overwrite a line's quantity; zero removes the line.
    async fn update_quantity(
        &self,
        user: UserUuid,
        item: MenuItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Delete the user's cart. Clearing an absent cart succeeds.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
