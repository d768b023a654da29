//! Catalog Repository
//!
//! Read-only menu lookups used to resolve cart and order lines.

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Row, Transaction, query, query_as};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    amounts::try_get_optional_amount,
    restaurants::{
        lookup::CatalogEntry,
        models::{MenuItemUuid, Restaurant, RestaurantUuid},
        repositories::PgMenuItemsRepository,
    },
};

const FIND_MENU_ITEM_SQL: &str = include_str!("../sql/find_menu_item.sql");
const FIND_MENU_ITEM_NAMES_SQL: &str = include_str!("../sql/find_menu_item_names.sql");
const FIND_RESTAURANT_CONTAINING_ANY_SQL: &str =
    include_str!("../sql/find_restaurant_containing_any.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository {
    menu_items: PgMenuItemsRepository,
}

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            menu_items: PgMenuItemsRepository::new(),
        }
    }

    #[tracing::instrument(
        name = "catalog.repository.find_menu_item",
        skip(self, tx, item),
        fields(menu_item = %item),
        err
    )]
    pub(crate) async fn find_menu_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: MenuItemUuid,
    ) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let row = query(FIND_MENU_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| -> Result<CatalogEntry, sqlx::Error> {
            Ok(CatalogEntry {
                restaurant: RestaurantUuid::from_uuid(row.try_get("restaurant_uuid")?),
                menu_item: MenuItemUuid::from_uuid(row.try_get("uuid")?),
                name: row.try_get("name")?,
                price: try_get_optional_amount(&row, "price")?,
                image: row.try_get("image")?,
            })
        })
        .transpose()
    }

    /// Current, non-blank names of the given menu items. Items that no longer exist
    /// are absent from the map.
    #[tracing::instrument(
        name = "catalog.repository.find_menu_item_names",
        skip(self, tx, items),
        fields(
            requested_count = items.len(),
            found_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn find_menu_item_names(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[MenuItemUuid],
    ) -> Result<FxHashMap<MenuItemUuid, String>, sqlx::Error> {
        if items.is_empty() {
            return Ok(FxHashMap::default());
        }

        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        let rows: Vec<(Uuid, String)> = query_as(FIND_MENU_ITEM_NAMES_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let names: FxHashMap<MenuItemUuid, String> = rows
            .into_iter()
            .map(|(uuid, name)| (MenuItemUuid::from_uuid(uuid), name))
            .collect();

        tracing::Span::current().record("found_count", names.len());

        debug!(found_count = names.len(), "resolved menu item names");

        Ok(names)
    }

    /// The oldest restaurant whose menu contains any of `items`, with its full menu.
    #[tracing::instrument(
        name = "catalog.repository.find_restaurant_containing_any",
        skip(self, tx, items),
        fields(requested_count = items.len()),
        err
    )]
    pub(crate) async fn find_restaurant_containing_any(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[MenuItemUuid],
    ) -> Result<Option<Restaurant>, sqlx::Error> {
        if items.is_empty() {
            return Ok(None);
        }

        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        let restaurant = query_as::<Postgres, Restaurant>(FIND_RESTAURANT_CONTAINING_ANY_SQL)
            .bind(&uuids)
            .fetch_optional(&mut **tx)
            .await?;

        let Some(mut restaurant) = restaurant else {
            return Ok(None);
        };

        restaurant.menu = self
            .menu_items
            .list_menu_items(tx, &[restaurant.uuid])
            .await?;

        Ok(Some(restaurant))
    }
}
