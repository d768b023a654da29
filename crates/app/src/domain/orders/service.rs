//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::repositories::{PgCartLinesRepository, PgCartsRepository},
        orders::{
            checkout::{build_order_lines, order_total},
            data::CheckoutDetails,
            errors::OrdersServiceError,
            models::{Order, OrderStatus, OrderUuid},
            repositories::{PgOrderLinesRepository, PgOrdersRepository},
        },
        restaurants::{
            RestaurantsServiceError,
            lookup::MenuLookup,
            models::{Restaurant, RestaurantUuid},
            repositories::{PgCatalogRepository, PgRestaurantsRepository},
        },
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    lines_repository: PgOrderLinesRepository,
    carts_repository: PgCartsRepository,
    cart_lines_repository: PgCartLinesRepository,
    catalog_repository: PgCatalogRepository,
    restaurants_repository: PgRestaurantsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            lines_repository: PgOrderLinesRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_lines_repository: PgCartLinesRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
            restaurants_repository: PgRestaurantsRepository::new(),
        }
    }

    async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut orders: Vec<Order>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut lines = self.lines_repository.list_order_lines(tx, &uuids).await?;

        for order in &mut orders {
            order.lines = lines.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn restaurant_of(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, OrdersServiceError> {
        self.restaurants_repository
            .get_restaurant(tx, restaurant)
            .await
            .map_err(|error| match RestaurantsServiceError::from(error) {
                RestaurantsServiceError::NotFound => OrdersServiceError::RestaurantNotFound,
                RestaurantsServiceError::Sql(error) => OrdersServiceError::Sql(error),
                _ => OrdersServiceError::InvalidData,
            })
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, user, details),
        fields(user = %user, order = tracing::field::Empty),
        err
    )]
    async fn create_order(
        &self,
        user: UserUuid,
        details: CheckoutDetails,
    ) -> Result<Order, OrdersServiceError> {
        let details = details.normalized();

        let mut tx = self.db.begin().await?;

        let Some(cart) = self.carts_repository.get_cart_for_update(&mut tx, user).await? else {
            return Err(OrdersServiceError::CartEmpty);
        };

        let cart_lines = self
            .cart_lines_repository
            .get_cart_lines(&mut tx, cart.uuid)
            .await?;

        if cart_lines.is_empty() {
            return Err(OrdersServiceError::CartEmpty);
        }

        let items: Vec<_> = cart_lines.iter().map(|line| line.menu_item).collect();

        let restaurant = self
            .catalog_repository
            .find_restaurant_containing_any(&mut tx, &items)
            .await?
            .ok_or(OrdersServiceError::RestaurantNotFound)?;

        let lookup = MenuLookup::from_menu(&restaurant.menu, &items);

        let lines = build_order_lines(&cart_lines, &lookup).inspect_err(|error| {
            warn!(
                cart = %cart.uuid,
                restaurant = %restaurant.uuid,
                %error,
                "cart line no longer resolves against the menu"
            );
        })?;

        let now = Timestamp::now();

        let pending = Order {
            uuid: OrderUuid::new(),
            user,
            restaurant: restaurant.uuid,
            total_price: order_total(&lines)?,
            lines,
            status: OrderStatus::Pending,
            delivery_address: details.delivery_address,
            payment_method: details.payment_method,
            created_at: now,
            updated_at: now,
        };

        let mut created = self
            .orders_repository
            .create_order(&mut tx, &pending)
            .await?;

        self.lines_repository
            .create_order_lines(&mut tx, created.uuid, &pending.lines)
            .await?;

        created.lines = pending.lines;

        self.carts_repository.delete_cart(&mut tx, user).await?;

        tx.commit().await?;

        tracing::Span::current().record("order", tracing::field::display(created.uuid));

        info!(
            order = %created.uuid,
            restaurant = %created.restaurant,
            total_price = created.total_price,
            lines = created.lines.len(),
            "created order"
        );

        Ok(created)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_user_orders(&mut tx, user).await?;
        let orders = self.attach_lines(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        caller: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;

        if order.user != caller {
            let restaurant = self.restaurant_of(&mut tx, order.restaurant).await?;

            if !restaurant.is_owned_by(caller) {
                return Err(OrdersServiceError::Forbidden);
            }
        }

        let mut orders = self.attach_lines(&mut tx, vec![order]).await?;

        tx.commit().await?;

        orders.pop().ok_or(OrdersServiceError::NotFound)
    }

    async fn list_restaurant_orders(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let restaurant = self.restaurant_of(&mut tx, restaurant).await?;

        if !restaurant.is_owned_by(caller) {
            return Err(OrdersServiceError::Forbidden);
        }

        let orders = self
            .orders_repository
            .list_restaurant_orders(&mut tx, restaurant.uuid)
            .await?;

        let orders = self.attach_lines(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, caller, order),
        fields(caller = %caller, order = %order),
        err
    )]
    async fn update_status(
        &self,
        caller: UserUuid,
        order: OrderUuid,
        status: String,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        let restaurant = self.restaurant_of(&mut tx, current.restaurant).await?;

        if !restaurant.is_owned_by(caller) {
            warn!("rejected status change from non-owner");

            return Err(OrdersServiceError::Forbidden);
        }

        let status = status
            .parse::<OrderStatus>()
            .map_err(|error| OrdersServiceError::InvalidStatus(error.0))?;

        let updated_at = self
            .orders_repository
            .update_order_status(&mut tx, order, status)
            .await?;

        let mut orders = self.attach_lines(&mut tx, vec![current]).await?;

        tx.commit().await?;

        let mut updated = orders.pop().ok_or(OrdersServiceError::NotFound)?;

        info!(from = %updated.status, to = %status, "updated order status");

        updated.status = status;
        updated.updated_at = updated_at;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Check out the user's cart: snapshot it into a pending order priced from the
    /// current menu, then delete the cart. Nothing changes if any step fails.
    async fn create_order(
        &self,
        user: UserUuid,
        details: CheckoutDetails,
    ) -> Result<Order, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// A single order, visible to the customer who placed it and to the restaurant owner.
    async fn get_order(
        &self,
        caller: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Orders placed with a restaurant, newest first. Owner only.
    async fn list_restaurant_orders(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Set an order's status. Only the restaurant owner may do this; `status` must
    /// name one of the [`OrderStatus`] values.
    async fn update_status(
        &self,
        caller: UserUuid,
        order: OrderUuid,
        status: String,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::query;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::{CartsService, CartsServiceError},
            restaurants::RestaurantsService,
        },
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn checkout_creates_pending_order_and_deletes_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let (customer, restaurant) = helpers::customer_and_restaurant(&ctx).await?;
        let dosa = helpers::menu_item(&restaurant, "Masala Dosa")?;
        let coffee = helpers::menu_item(&restaurant, "Filter Coffee")?;

        ctx.carts.add_item(customer.uuid, dosa.uuid, 2).await?;
        ctx.carts.add_item(customer.uuid, coffee.uuid, 3).await?;

        let order = ctx
            .orders
            .create_order(
                customer.uuid,
                CheckoutDetails {
                    delivery_address: Some(" 12 MG Road ".to_string()),
                    payment_method: Some("cod".to_string()),
                },
            )
            .await?;

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.restaurant, restaurant.uuid);
        assert_eq!(order.total_price, dosa.price * 2 + coffee.price * 3);
        assert_eq!(order.delivery_address.as_deref(), Some("12 MG Road"));
        assert_eq!(order.lines.len(), 2);

        let cart = ctx.carts.get_cart(customer.uuid).await;

        assert!(
            matches!(cart, Err(CartsServiceError::NotFound)),
            "cart should be deleted after checkout, got {cart:?}"
        );

        let fetched = ctx.orders.get_order(customer.uuid, order.uuid).await?;

        assert_eq!(fetched, order);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_prices_from_current_menu() -> TestResult {
        let ctx = TestContext::new().await;
        let (customer, restaurant) = helpers::customer_and_restaurant(&ctx).await?;
        let dosa = helpers::menu_item(&restaurant, "Masala Dosa")?;

        ctx.carts.add_item(customer.uuid, dosa.uuid, 2).await?;

        query("UPDATE menu_items SET price = 500 WHERE uuid = $1")
            .bind(dosa.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let order = ctx
            .orders
            .create_order(customer.uuid, CheckoutDetails::default())
            .await?;

        assert_eq!(order.total_price, 1000);
        assert_eq!(order.lines.first().map(|line| line.price), Some(500));

        Ok(())
    }

    #[tokio::test]
    async fn checkout_without_cart_fails_and_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = helpers::create_user(&ctx, "customer@example.com").await?;

        let result = ctx
            .orders
            .create_order(customer.uuid, CheckoutDetails::default())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::CartEmpty)),
            "expected CartEmpty, got {result:?}"
        );
        assert!(ctx.orders.list_orders(customer.uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_deleted_menu_item_keeps_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let (customer, restaurant) = helpers::customer_and_restaurant(&ctx).await?;
        let dosa = helpers::menu_item(&restaurant, "Masala Dosa")?;
        let coffee = helpers::menu_item(&restaurant, "Filter Coffee")?;

        ctx.carts.add_item(customer.uuid, dosa.uuid, 1).await?;
        ctx.carts.add_item(customer.uuid, coffee.uuid, 1).await?;

        ctx.restaurants
            .delete_menu_item(restaurant.owner, restaurant.uuid, coffee.uuid)
            .await?;

        let result = ctx
            .orders
            .create_order(customer.uuid, CheckoutDetails::default())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::MissingMenuItem(uuid)) if uuid == coffee.uuid),
            "expected MissingMenuItem, got {result:?}"
        );

        let cart = ctx.carts.get_cart(customer.uuid).await?;

        assert_eq!(cart.lines.len(), 2);
        assert!(ctx.orders.list_orders(customer.uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn only_owner_can_update_status() -> TestResult {
        let ctx = TestContext::new().await;
        let (customer, restaurant) = helpers::customer_and_restaurant(&ctx).await?;
        let dosa = helpers::menu_item(&restaurant, "Masala Dosa")?;

        ctx.carts.add_item(customer.uuid, dosa.uuid, 1).await?;
        let order = helpers::checkout(&ctx, customer.uuid).await?;

        let result = ctx
            .orders
            .update_status(customer.uuid, order.uuid, "delivered".to_string())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        let untouched = ctx.orders.get_order(customer.uuid, order.uuid).await?;

        assert_eq!(
            untouched.status,
            OrderStatus::Pending,
            "a rejected update must not change the status"
        );

        let updated = ctx
            .orders
            .update_status(restaurant.owner, order.uuid, "preparing".to_string())
            .await?;

        assert_eq!(updated.status, OrderStatus::Preparing);

        let fetched = ctx.orders.get_order(customer.uuid, order.uuid).await?;

        assert_eq!(fetched.status, OrderStatus::Preparing);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_status_leaves_order_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let (customer, restaurant) = helpers::customer_and_restaurant(&ctx).await?;
        let dosa = helpers::menu_item(&restaurant, "Masala Dosa")?;

        ctx.carts.add_item(customer.uuid, dosa.uuid, 1).await?;
        let order = helpers::checkout(&ctx, customer.uuid).await?;

        let result = ctx
            .orders
            .update_status(restaurant.owner, order.uuid, "shipped".to_string())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidStatus(ref status)) if status == "shipped"),
            "expected InvalidStatus, got {result:?}"
        );

        let fetched = ctx.orders.get_order(customer.uuid, order.uuid).await?;

        assert_eq!(fetched.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn strangers_cannot_see_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let (customer, restaurant) = helpers::customer_and_restaurant(&ctx).await?;
        let stranger = helpers::create_user(&ctx, "stranger@example.com").await?;
        let dosa = helpers::menu_item(&restaurant, "Masala Dosa")?;

        ctx.carts.add_item(customer.uuid, dosa.uuid, 1).await?;
        let order = helpers::checkout(&ctx, customer.uuid).await?;

        let result = ctx.orders.get_order(stranger.uuid, order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        let owner_view = ctx
            .orders
            .list_restaurant_orders(restaurant.owner, restaurant.uuid)
            .await?;

        assert_eq!(owner_view.len(), 1);

        let result = ctx
            .orders
            .list_restaurant_orders(stranger.uuid, restaurant.uuid)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }
}
