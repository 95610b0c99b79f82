//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::{
        data::NewCart,
        models::{Cart, CartUuid, LineItemUuid, LineItems},
    },
    users::models::UserUuid,
};

const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const SET_CART_LINE_ITEMS_SQL: &str = include_str!("../sql/set_cart_line_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Load a cart with its line items as bare identifiers.
    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: NewCart,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.user_uuid.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    /// Replace the cart's ordered line item sequence.
    pub(crate) async fn set_line_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        line_items: &[LineItemUuid],
    ) -> Result<Cart, sqlx::Error> {
        let line_items: Vec<Uuid> = line_items.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, Cart>(SET_CART_LINE_ITEMS_SQL)
            .bind(cart.into_uuid())
            .bind(line_items)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let line_items: Vec<Uuid> = row.try_get("line_items")?;

        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            line_items: LineItems::Unresolved(
                line_items.into_iter().map(LineItemUuid::from_uuid).collect(),
            ),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
