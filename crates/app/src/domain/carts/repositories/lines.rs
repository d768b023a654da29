//! Cart Lines Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    amounts::{amount_to_i64, position_to_i32, quantity_to_i32, try_get_amount, try_get_quantity},
    carts::models::{CartLine, CartUuid},
    restaurants::models::MenuItemUuid,
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const DELETE_CART_LINES_SQL: &str = include_str!("../sql/delete_cart_lines.sql");
const CREATE_CART_LINE_SQL: &str = include_str!("../sql/create_cart_line.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Replace the stored lines with `lines`, preserving their order.
    #[tracing::instrument(
        name = "carts.repository.replace_cart_lines",
        skip(self, tx, lines),
        fields(cart = %cart, line_count = lines.len()),
        err
    )]
    pub(crate) async fn replace_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        lines: &[CartLine],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        for (position, line) in lines.iter().enumerate() {
            query(CREATE_CART_LINE_SQL)
                .bind(cart.into_uuid())
                .bind(line.menu_item.into_uuid())
                .bind(position_to_i32(position)?)
                .bind(quantity_to_i32(line.quantity, "quantity")?)
                .bind(line.name.as_deref())
                .bind(amount_to_i64(line.price, "price")?)
                .bind(line.image.as_deref())
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            menu_item: MenuItemUuid::from_uuid(row.try_get("menu_item_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            image: row.try_get("image")?,
        })
    }
}
