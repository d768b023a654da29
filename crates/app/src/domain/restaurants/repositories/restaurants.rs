//! Restaurants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    restaurants::{
        data::{NewRestaurant, RestaurantFilter},
        models::{Cuisines, Restaurant, RestaurantUuid},
    },
    users::models::UserUuid,
};

const LIST_RESTAURANTS_SQL: &str = include_str!("../sql/list_restaurants.sql");
const LIST_OWNED_RESTAURANTS_SQL: &str = include_str!("../sql/list_owned_restaurants.sql");
const GET_RESTAURANT_SQL: &str = include_str!("../sql/get_restaurant.sql");
const GET_RESTAURANT_FOR_UPDATE_SQL: &str = include_str!("../sql/get_restaurant_for_update.sql");
const CREATE_RESTAURANT_SQL: &str = include_str!("../sql/create_restaurant.sql");
const UPDATE_RESTAURANT_SQL: &str = include_str!("../sql/update_restaurant.sql");
const DELETE_RESTAURANT_SQL: &str = include_str!("../sql/delete_restaurant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRestaurantsRepository;

impl PgRestaurantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Restaurants matching `filter`, without menus.
    pub(crate) async fn list_restaurants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &RestaurantFilter,
    ) -> Result<Vec<Restaurant>, sqlx::Error> {
        query_as::<Postgres, Restaurant>(LIST_RESTAURANTS_SQL)
            .bind(filter.search.as_deref().map(escape_like))
            .bind(filter.location.as_deref().map(escape_like))
            .bind(filter.min_rating)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_owned_restaurants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Vec<Restaurant>, sqlx::Error> {
        query_as::<Postgres, Restaurant>(LIST_OWNED_RESTAURANTS_SQL)
            .bind(owner.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_restaurant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, sqlx::Error> {
        query_as::<Postgres, Restaurant>(GET_RESTAURANT_SQL)
            .bind(restaurant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch and row-lock a restaurant for the rest of the transaction.
    pub(crate) async fn get_restaurant_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
    ) -> Result<Restaurant, sqlx::Error> {
        query_as::<Postgres, Restaurant>(GET_RESTAURANT_FOR_UPDATE_SQL)
            .bind(restaurant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_restaurant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        restaurant: &NewRestaurant,
    ) -> Result<Restaurant, sqlx::Error> {
        query_as::<Postgres, Restaurant>(CREATE_RESTAURANT_SQL)
            .bind(restaurant.uuid.into_uuid())
            .bind(&restaurant.name)
            .bind(&restaurant.location)
            .bind(owner.into_uuid())
            .bind(restaurant.image.as_deref())
            .bind(restaurant.cuisines.as_slice())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_restaurant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: &Restaurant,
    ) -> Result<Restaurant, sqlx::Error> {
        query_as::<Postgres, Restaurant>(UPDATE_RESTAURANT_SQL)
            .bind(restaurant.uuid.into_uuid())
            .bind(&restaurant.name)
            .bind(&restaurant.location)
            .bind(restaurant.image.as_deref())
            .bind(restaurant.cuisines.as_slice())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_restaurant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        restaurant: RestaurantUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_RESTAURANT_SQL)
            .bind(restaurant.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Escape `LIKE` wildcards so filters match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}

impl<'r> FromRow<'r, PgRow> for Restaurant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let cuisines: Vec<String> = row.try_get("cuisines")?;

        Ok(Self {
            uuid: RestaurantUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            location: row.try_get("location")?,
            owner: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            image: row.try_get("image")?,
            cuisines: Cuisines::from_vec(cuisines),
            rating: row.try_get("rating")?,
            menu: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Dosa Corner"), "Dosa Corner");
    }
}
