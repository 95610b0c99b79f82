//! Line Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::{
        data::{NewLineItem, Quantity},
        models::{CartUuid, LineItem, LineItemUuid},
    },
    products::{models::ProductUuid, repository::try_get_amount},
};

const GET_LINE_ITEMS_SQL: &str = include_str!("../sql/get_line_items.sql");
const CREATE_LINE_ITEM_SQL: &str = include_str!("../sql/create_line_item.sql");
const UPDATE_LINE_ITEM_QUANTITY_SQL: &str = include_str!("../sql/update_line_item_quantity.sql");
const DELETE_LINE_ITEM_SQL: &str = include_str!("../sql/delete_line_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLineItemsRepository;

impl PgLineItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch line items in the order of `line_items`. Identifiers without a
    /// row are absent from the result.
    pub(crate) async fn get_line_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line_items: &[LineItemUuid],
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        let line_items: Vec<Uuid> = line_items.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, LineItem>(GET_LINE_ITEMS_SQL)
            .bind(line_items)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_line_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: NewLineItem,
    ) -> Result<LineItem, sqlx::Error> {
        let price = i64::try_from(item.price).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, LineItem>(CREATE_LINE_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(item.product_name)
            .bind(price)
            .bind(encode_quantity(item.quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: LineItemUuid,
        quantity: Quantity,
    ) -> Result<LineItem, sqlx::Error> {
        query_as::<Postgres, LineItem>(UPDATE_LINE_ITEM_QUANTITY_SQL)
            .bind(item.into_uuid())
            .bind(encode_quantity(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_line_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: LineItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LINE_ITEM_SQL)
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn encode_quantity(quantity: Quantity) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity.get()).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for LineItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            uuid: LineItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            price: try_get_amount(row, "price")?,
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
