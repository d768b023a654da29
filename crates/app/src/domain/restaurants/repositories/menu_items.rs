//! Menu Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    amounts::{amount_to_i64, try_get_amount},
    restaurants::{
        data::NewMenuItem,
        models::{MenuItem, MenuItemUuid, RestaurantUuid},
    },
};

const LIST_MENU_ITEMS_SQL: &str = include_str!("../sql/list_menu_items.sql");
const GET_MENU_ITEM_FOR_UPDATE_SQL: &str = include_str!("../sql/get_menu_item_for_update.sql");
const CREATE_MENU_ITEM_SQL: &str = include_str!("../sql/create_menu_item.sql");
const UPDATE_MENU_ITEM_SQL: &str = include_str!("../sql/update_menu_item.sql");
const DELETE_MENU_ITEM_SQL: &str = include_str!("../sql/delete_menu_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMenuItemsRepository;

impl PgMenuItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Menu items of every listed restaurant, grouped by restaurant in menu order.
    pub(crate) async fn list_menu_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurants: &[RestaurantUuid],
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let uuids: Vec<Uuid> = restaurants.iter().map(|r| r.into_uuid()).collect();

        query_as::<Postgres, MenuItem>(LIST_MENU_ITEMS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_menu_item_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
        item: MenuItemUuid,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        query_as::<Postgres, MenuItem>(GET_MENU_ITEM_FOR_UPDATE_SQL)
            .bind(restaurant.into_uuid())
            .bind(item.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Append an item to the end of the restaurant's menu.
    pub(crate) async fn create_menu_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
        item: &NewMenuItem,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Postgres, MenuItem>(CREATE_MENU_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(restaurant.into_uuid())
            .bind(&item.name)
            .bind(amount_to_i64(item.price, "price")?)
            .bind(item.description.as_deref())
            .bind(item.image.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_menu_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &MenuItem,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Postgres, MenuItem>(UPDATE_MENU_ITEM_SQL)
            .bind(item.restaurant.into_uuid())
            .bind(item.uuid.into_uuid())
            .bind(&item.name)
            .bind(amount_to_i64(item.price, "price")?)
            .bind(item.description.as_deref())
            .bind(item.image.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_menu_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
        item: MenuItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_MENU_ITEM_SQL)
            .bind(restaurant.into_uuid())
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for MenuItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MenuItemUuid::from_uuid(row.try_get("uuid")?),
            restaurant: RestaurantUuid::from_uuid(row.try_get("restaurant_uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
