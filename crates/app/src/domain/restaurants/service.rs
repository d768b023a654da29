//! Restaurants service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        restaurants::{
            data::{
                MenuItemUpdate, NewMenuItem, NewRestaurant, RestaurantFilter, RestaurantUpdate,
                non_blank, normalize_cuisines,
            },
            errors::RestaurantsServiceError,
            models::{MenuItem, MenuItemUuid, Restaurant, RestaurantUuid},
            repositories::{PgMenuItemsRepository, PgRestaurantsRepository},
        },
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgRestaurantsService {
    db: Db,
    restaurants_repository: PgRestaurantsRepository,
    menu_items_repository: PgMenuItemsRepository,
}

impl PgRestaurantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            restaurants_repository: PgRestaurantsRepository::new(),
            menu_items_repository: PgMenuItemsRepository::new(),
        }
    }

    /// Load every menu in one query and hand each restaurant its own items.
    async fn attach_menus(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut restaurants: Vec<Restaurant>,
    ) -> Result<Vec<Restaurant>, RestaurantsServiceError> {
        if restaurants.is_empty() {
            return Ok(restaurants);
        }

        let uuids: Vec<RestaurantUuid> = restaurants.iter().map(|r| r.uuid).collect();

        let mut menus: FxHashMap<RestaurantUuid, Vec<MenuItem>> = FxHashMap::default();

        for item in self.menu_items_repository.list_menu_items(tx, &uuids).await? {
            menus.entry(item.restaurant).or_default().push(item);
        }

        for restaurant in &mut restaurants {
            restaurant.menu = menus.remove(&restaurant.uuid).unwrap_or_default();
        }

        Ok(restaurants)
    }

    /// Lock the restaurant and make sure `caller` owns it.
    async fn lock_owned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        caller: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, RestaurantsServiceError> {
        let restaurant = self
            .restaurants_repository
            .get_restaurant_for_update(tx, restaurant)
            .await?;

        if !restaurant.is_owned_by(caller) {
            warn!(
                restaurant = %restaurant.uuid,
                caller = %caller,
                "rejected restaurant change from non-owner"
            );

            return Err(RestaurantsServiceError::Forbidden);
        }

        Ok(restaurant)
    }
}

#[async_trait]
impl RestaurantsService for PgRestaurantsService {
    async fn list_restaurants(
        &self,
        filter: RestaurantFilter,
    ) -> Result<Vec<Restaurant>, RestaurantsServiceError> {
        filter.validate()?;

        let mut tx = self.db.begin().await?;

        let restaurants = self
            .restaurants_repository
            .list_restaurants(&mut tx, &filter)
            .await?;

        let restaurants = self.attach_menus(&mut tx, restaurants).await?;

        tx.commit().await?;

        Ok(restaurants)
    }

    async fn list_owned_restaurants(
        &self,
        owner: UserUuid,
    ) -> Result<Vec<Restaurant>, RestaurantsServiceError> {
        let mut tx = self.db.begin().await?;

        let restaurants = self
            .restaurants_repository
            .list_owned_restaurants(&mut tx, owner)
            .await?;

        let restaurants = self.attach_menus(&mut tx, restaurants).await?;

        tx.commit().await?;

        Ok(restaurants)
    }

    async fn get_restaurant(
        &self,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, RestaurantsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut restaurant = self
            .restaurants_repository
            .get_restaurant(&mut tx, restaurant)
            .await?;

        restaurant.menu = self
            .menu_items_repository
            .list_menu_items(&mut tx, &[restaurant.uuid])
            .await?;

        tx.commit().await?;

        Ok(restaurant)
    }

    async fn create_restaurant(
        &self,
        owner: UserUuid,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, RestaurantsServiceError> {
        let restaurant = restaurant.normalized()?;

        let mut tx = self.db.begin().await?;

        let mut created = self
            .restaurants_repository
            .create_restaurant(&mut tx, owner, &restaurant)
            .await?;

        for item in &restaurant.menu {
            let item = self
                .menu_items_repository
                .create_menu_item(&mut tx, created.uuid, item)
                .await?;

            created.menu.push(item);
        }

        tx.commit().await?;

        info!(
            restaurant = %created.uuid,
            owner = %owner,
            menu_items = created.menu.len(),
            "created restaurant"
        );

        Ok(created)
    }

    async fn update_restaurant(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantsServiceError> {
        let name = update
            .name
            .as_deref()
            .map(|name| non_blank(name, RestaurantsServiceError::InvalidName))
            .transpose()?;

        let location = update
            .location
            .as_deref()
            .map(|location| non_blank(location, RestaurantsServiceError::InvalidLocation))
            .transpose()?;

        let mut tx = self.db.begin().await?;

        let mut current = self.lock_owned(&mut tx, caller, restaurant).await?;

        if let Some(name) = name {
            current.name = name;
        }

        if let Some(location) = location {
            current.location = location;
        }

        if let Some(cuisines) = update.cuisines {
            current.cuisines = normalize_cuisines(cuisines);
        }

        current.image = update.image.apply(current.image);

        let mut updated = self
            .restaurants_repository
            .update_restaurant(&mut tx, &current)
            .await?;

        updated.menu = self
            .menu_items_repository
            .list_menu_items(&mut tx, &[updated.uuid])
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_restaurant(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<(), RestaurantsServiceError> {
        let mut tx = self.db.begin().await?;

        self.lock_owned(&mut tx, caller, restaurant).await?;

        let rows_affected = self
            .restaurants_repository
            .delete_restaurant(&mut tx, restaurant)
            .await
            .map_err(|error| match RestaurantsServiceError::from(error) {
                RestaurantsServiceError::InvalidReference => RestaurantsServiceError::HasOrders,
                other => other,
            })?;

        if rows_affected == 0 {
            return Err(RestaurantsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(restaurant = %restaurant, "deleted restaurant");

        Ok(())
    }

    async fn list_menu_items(
        &self,
        restaurant: RestaurantUuid,
    ) -> Result<Vec<MenuItem>, RestaurantsServiceError> {
        let mut tx = self.db.begin().await?;

        // Distinguish an unknown restaurant from an empty menu.
        self.restaurants_repository
            .get_restaurant(&mut tx, restaurant)
            .await?;

        let items = self
            .menu_items_repository
            .list_menu_items(&mut tx, &[restaurant])
            .await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn add_menu_item(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        item: NewMenuItem,
    ) -> Result<MenuItem, RestaurantsServiceError> {
        let item = item.normalized()?;

        let mut tx = self.db.begin().await?;

        self.lock_owned(&mut tx, caller, restaurant).await?;

        let created = self
            .menu_items_repository
            .create_menu_item(&mut tx, restaurant, &item)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_menu_item(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        item: MenuItemUuid,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, RestaurantsServiceError> {
        let name = update
            .name
            .as_deref()
            .map(|name| non_blank(name, RestaurantsServiceError::InvalidMenuItemName))
            .transpose()?;

        let mut tx = self.db.begin().await?;

        self.lock_owned(&mut tx, caller, restaurant).await?;

        let mut current = self
            .menu_items_repository
            .get_menu_item_for_update(&mut tx, restaurant, item)
            .await?
            .ok_or(RestaurantsServiceError::MenuItemNotFound)?;

        if let Some(name) = name {
            current.name = name;
        }

        if let Some(price) = update.price {
            current.price = price;
        }

        current.description = update.description.apply(current.description);
        current.image = update.image.apply(current.image);

        let updated = self
            .menu_items_repository
            .update_menu_item(&mut tx, &current)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_menu_item(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        item: MenuItemUuid,
    ) -> Result<(), RestaurantsServiceError> {
        let mut tx = self.db.begin().await?;

        self.lock_owned(&mut tx, caller, restaurant).await?;

        let rows_affected = self
            .menu_items_repository
            .delete_menu_item(&mut tx, restaurant, item)
            .await?;

        if rows_affected == 0 {
            return Err(RestaurantsServiceError::MenuItemNotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait RestaurantsService: Send + Sync {
    /// List restaurants with their menus, oldest first.
    async fn list_restaurants(
        &self,
        filter: RestaurantFilter,
    ) -> Result<Vec<Restaurant>, RestaurantsServiceError>;

    /// List the restaurants owned by a user.
    async fn list_owned_restaurants(
        &self,
        owner: UserUuid,
    ) -> Result<Vec<Restaurant>, RestaurantsServiceError>;

    /// Retrieve a single restaurant with its menu.
    async fn get_restaurant(
        &self,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, RestaurantsServiceError>;

    /// Create a restaurant owned by `owner`, with an optional initial menu.
    async fn create_restaurant(
        &self,
        owner: UserUuid,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, RestaurantsServiceError>;

    /// Update restaurant details. Only the owner may do this.
    async fn update_restaurant(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantsServiceError>;

    /// Delete a restaurant and its menu. Restaurants with orders cannot be deleted.
    async fn delete_restaurant(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
    ) -> Result<(), RestaurantsServiceError>;

    /// List a restaurant's menu in display order.
    async fn list_menu_items(
        &self,
        restaurant: RestaurantUuid,
    ) -> Result<Vec<MenuItem>, RestaurantsServiceError>;

    /// Append an item to a restaurant's menu.
    async fn add_menu_item(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        item: NewMenuItem,
    ) -> Result<MenuItem, RestaurantsServiceError>;

    /// Update a menu item in place.
    async fn update_menu_item(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        item: MenuItemUuid,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, RestaurantsServiceError>;

    /// Remove a menu item. Carts still holding it keep their cached copy.
    async fn delete_menu_item(
        &self,
        caller: UserUuid,
        restaurant: RestaurantUuid,
        item: MenuItemUuid,
    ) -> Result<(), RestaurantsServiceError>;
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        domain::fields::FieldUpdate,
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn create_restaurant_keeps_menu_order() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;

        let restaurant = helpers::create_restaurant(
            &ctx,
            owner.uuid,
            "Dosa Corner",
            &[("Masala Dosa", 120), ("Filter Coffee", 40)],
        )
        .await?;

        let names: Vec<&str> = restaurant.menu.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(names, ["Masala Dosa", "Filter Coffee"]);
        assert_eq!(restaurant.owner, owner.uuid);

        let fetched = ctx.restaurants.get_restaurant(restaurant.uuid).await?;

        assert_eq!(fetched.menu, restaurant.menu);

        Ok(())
    }

    #[tokio::test]
    async fn list_restaurants_filters_by_name_and_location() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;

        helpers::create_restaurant(&ctx, owner.uuid, "Dosa Corner", &[]).await?;
        helpers::create_restaurant(&ctx, owner.uuid, "Pizza Place", &[]).await?;

        let found = ctx
            .restaurants
            .list_restaurants(RestaurantFilter {
                search: Some("dosa".to_string()),
                location: Some("BENGALURU".to_string()),
                min_rating: None,
            })
            .await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|r| r.name.as_str()), Some("Dosa Corner"));

        Ok(())
    }

    #[tokio::test]
    async fn non_owner_cannot_update_restaurant() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;
        let other = helpers::create_user(&ctx, "other@example.com").await?;

        let restaurant = helpers::create_restaurant(&ctx, owner.uuid, "Dosa Corner", &[]).await?;

        let result = ctx
            .restaurants
            .update_restaurant(
                other.uuid,
                restaurant.uuid,
                RestaurantUpdate {
                    name: Some("Hijacked".to_string()),
                    ..RestaurantUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(RestaurantsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        let unchanged = ctx.restaurants.get_restaurant(restaurant.uuid).await?;

        assert_eq!(unchanged.name, "Dosa Corner");

        Ok(())
    }

    #[tokio::test]
    async fn update_restaurant_replaces_cuisines_and_clears_image() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;
        let restaurant = helpers::create_restaurant(&ctx, owner.uuid, "Dosa Corner", &[]).await?;

        let updated = ctx
            .restaurants
            .update_restaurant(
                owner.uuid,
                restaurant.uuid,
                RestaurantUpdate {
                    cuisines: Some(smallvec!["South Indian".to_string()]),
                    image: FieldUpdate::Clear,
                    ..RestaurantUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.cuisines.as_slice(), ["South Indian"]);
        assert_eq!(updated.image, None);
        assert_eq!(updated.name, "Dosa Corner");

        Ok(())
    }

    #[tokio::test]
    async fn update_menu_item_clears_description_with_empty_text() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;
        let restaurant =
            helpers::create_restaurant(&ctx, owner.uuid, "Dosa Corner", &[("Idli", 40)]).await?;
        let item = restaurant.menu.first().ok_or("menu should have an item")?;

        let updated = ctx
            .restaurants
            .update_menu_item(
                owner.uuid,
                restaurant.uuid,
                item.uuid,
                MenuItemUpdate {
                    price: Some(45),
                    description: FieldUpdate::from_text(Some(String::new())),
                    ..MenuItemUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.price, 45);
        assert_eq!(updated.name, "Idli");
        assert_eq!(updated.description, None);

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_menu_item_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;
        let restaurant = helpers::create_restaurant(&ctx, owner.uuid, "Dosa Corner", &[]).await?;

        let result = ctx
            .restaurants
            .delete_menu_item(owner.uuid, restaurant.uuid, MenuItemUuid::new())
            .await;

        assert!(
            matches!(result, Err(RestaurantsServiceError::MenuItemNotFound)),
            "expected MenuItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn restaurant_with_orders_cannot_be_deleted() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_user(&ctx, "owner@example.com").await?;
        let customer = helpers::create_user(&ctx, "customer@example.com").await?;
        let restaurant =
            helpers::create_restaurant(&ctx, owner.uuid, "Dosa Corner", &[("Idli", 40)]).await?;
        let item = restaurant.menu.first().ok_or("menu should have an item")?;

        helpers::add_to_cart(&ctx, customer.uuid, item.uuid, 1).await?;
        helpers::checkout(&ctx, customer.uuid).await?;

        let result = ctx
            .restaurants
            .delete_restaurant(owner.uuid, restaurant.uuid)
            .await;

        assert!(
            matches!(result, Err(RestaurantsServiceError::HasOrders)),
            "expected HasOrders, got {result:?}"
        );

        Ok(())
    }
}
