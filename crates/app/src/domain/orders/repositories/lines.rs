//! Order Lines Repository

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Row, Transaction, query};
use uuid::Uuid;

use crate::domain::{
    amounts::{
        amount_to_i64, position_to_i32, quantity_to_i32, try_get_amount, try_get_quantity,
    },
    orders::models::{OrderLine, OrderUuid},
    restaurants::models::MenuItemUuid,
};

const CREATE_ORDER_LINE_SQL: &str = include_str!("../sql/create_order_line.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("../sql/list_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLinesRepository;

impl PgOrderLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lines: &[OrderLine],
    ) -> Result<(), sqlx::Error> {
        for (position, line) in lines.iter().enumerate() {
            query(CREATE_ORDER_LINE_SQL)
                .bind(order.into_uuid())
                .bind(position_to_i32(position)?)
                .bind(line.menu_item.into_uuid())
                .bind(&line.name)
                .bind(amount_to_i64(line.price, "price")?)
                .bind(quantity_to_i32(line.quantity, "quantity")?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Lines of every listed order, keyed by order, each in original cart order.
    pub(crate) async fn list_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<FxHashMap<OrderUuid, Vec<OrderLine>>, sqlx::Error> {
        let mut lines: FxHashMap<OrderUuid, Vec<OrderLine>> = FxHashMap::default();

        if orders.is_empty() {
            return Ok(lines);
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        let rows = query(LIST_ORDER_LINES_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        for row in rows {
            let order = OrderUuid::from_uuid(row.try_get("order_uuid")?);

            lines.entry(order).or_default().push(OrderLine {
                menu_item: MenuItemUuid::from_uuid(row.try_get("menu_item_uuid")?),
                name: row.try_get("name")?,
                price: try_get_amount(&row, "price")?,
                quantity: try_get_quantity(&row, "quantity")?,
            });
        }

        Ok(lines)
    }
}
