//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{NewCart, NewLineItem, Quantity},
            errors::CartsServiceError,
            models::{Cart, CartUuid, LineItemUuid, LineItems},
            repositories::{PgCartsRepository, PgLineItemsRepository},
        },
        products::{models::ProductUuid, repository::PgProductsRepository},
        users::{models::User, repository::PgUsersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgLineItemsRepository,
    products_repository: PgProductsRepository,
    users_repository: PgUsersRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgLineItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            users_repository: PgUsersRepository::new(),
        }
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Cart, CartsServiceError> {
        let cart = self.carts_repository.get_cart(tx, cart).await?;

        self.resolve_line_items(tx, cart).await
    }

    async fn resolve_line_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut cart: Cart,
    ) -> Result<Cart, CartsServiceError> {
        let LineItems::Unresolved(uuids) = &cart.line_items else {
            return Ok(cart);
        };

        let items = if uuids.is_empty() {
            Vec::new()
        } else {
            self.items_repository.get_line_items(tx, uuids).await?
        };

        if items.len() != uuids.len() {
            warn!(
                cart_uuid = %cart.uuid,
                expected = uuids.len(),
                found = items.len(),
                "pruning line items that no longer exist from cart"
            );

            let remaining: Vec<LineItemUuid> = items.iter().map(|item| item.uuid).collect();

            cart.updated_at = self
                .carts_repository
                .set_line_items(tx, cart.uuid, &remaining)
                .await?
                .updated_at;
        }

        cart.line_items = LineItems::Resolved(items);

        Ok(cart)
    }

    async fn create_cart_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<&User>,
    ) -> Result<Cart, CartsServiceError> {
        let cart = self
            .carts_repository
            .create_cart(
                tx,
                NewCart {
                    uuid: CartUuid::new(),
                    user_uuid: user.map(|user| user.uuid),
                },
            )
            .await?;

        if let Some(user) = user {
            let rows_affected = self
                .users_repository
                .set_user_cart(tx, user.uuid, cart.uuid)
                .await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::InvalidReference);
            }
        }

        debug!(cart_uuid = %cart.uuid, user_uuid = ?user.map(|user| user.uuid), "created cart");

        self.resolve_line_items(tx, cart).await
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn attach_cart(&self, user: Option<User>) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(cart_uuid) = user.as_ref().and_then(|user| user.cart_uuid) {
            match self.load_cart(&mut tx, cart_uuid).await {
                Ok(cart) => {
                    tx.commit().await?;

                    return Ok(cart);
                }
                Err(CartsServiceError::NotFound) => {
                    warn!(%cart_uuid, "user cart no longer exists, creating a new one");
                }
                Err(error) => return Err(error),
            }
        }

        let cart = self.create_cart_for(&mut tx, user.as_ref()).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn populate_cart(&self, cart: Cart) -> Result<Cart, CartsServiceError> {
        if cart.line_items.is_resolved() {
            return Ok(cart);
        }

        if cart.line_items.is_empty() {
            return Ok(Cart {
                line_items: LineItems::Resolved(Vec::new()),
                ..cart
            });
        }

        let mut tx = self.db.begin().await?;

        let cart = self.resolve_line_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn add_item(
        &self,
        cart: Cart,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .products_repository
            .find_product(&mut tx, product)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        let item = self
            .items_repository
            .create_line_item(
                &mut tx,
                cart.uuid,
                NewLineItem::from_product(LineItemUuid::new(), &product, quantity),
            )
            .await?;

        let mut line_items = cart.line_items.uuids();

        line_items.push(item.uuid);

        self.carts_repository
            .set_line_items(&mut tx, cart.uuid, &line_items)
            .await?;

        let cart = self.load_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_quantity(
        &self,
        cart: Cart,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<Cart, CartsServiceError> {
        let position = cart.position_of_product(product)?;

        let item = cart
            .items()?
            .get(position)
            .map(|item| item.uuid)
            .ok_or_else(|| cart.product_not_in_cart(product))?;

        let mut tx = self.db.begin().await?;

        self.items_repository
            .update_quantity(&mut tx, item, quantity)
            .await?;

        let cart = self.load_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        cart: Cart,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let position = cart.position_of_product(product)?;

        let mut line_items = cart.line_items.uuids();

        if position >= line_items.len() {
            return Err(cart.product_not_in_cart(product));
        }

        let removed = line_items.remove(position);

        let mut tx = self.db.begin().await?;

        self.carts_repository
            .set_line_items(&mut tx, cart.uuid, &line_items)
            .await?;

        self.items_repository
            .delete_line_item(&mut tx, removed)
            .await?;

        let cart = self.load_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Find or create the cart for a session that has none yet.
    ///
    /// An authenticated user's stored cart is loaded when it still exists;
    /// otherwise a new cart is created and, for a user, linked to them in the
    /// same transaction. The returned cart is always resolved.
    async fn attach_cart(&self, user: Option<User>) -> Result<Cart, CartsServiceError>;

    /// Resolve line item identifiers to full line items, keeping their order.
    async fn populate_cart(&self, cart: Cart) -> Result<Cart, CartsServiceError>;

    /// Add a line item for `product`, snapshotting its name and price.
    async fn add_item(
        &self,
        cart: Cart,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<Cart, CartsServiceError>;

    /// Set the quantity on the first line item for `product`.
    async fn update_quantity(
        &self,
        cart: Cart,
        product: ProductUuid,
        quantity: Quantity,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove the first line item for `product`.
    async fn remove_item(&self, cart: Cart, product: ProductUuid)
    -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{carts::models::LineItem, users::UsersService},
        test::TestContext,
    };

    use super::*;

    fn quantity(value: u32) -> Quantity {
        Quantity::new(value).expect("test quantities are positive")
    }

    fn resolved(cart: &Cart) -> &[LineItem] {
        cart.items().expect("cart should be resolved")
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn attach_cart_for_anonymous_session_creates_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.attach_cart(None).await?;

        assert!(cart.user_uuid.is_none());
        assert_eq!(cart.line_items, LineItems::Resolved(Vec::new()));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn attach_cart_links_new_cart_to_user() -> TestResult {
        let ctx = TestContext::new().await;
        let issued = ctx.create_user("Ada").await;

        let cart = ctx.carts.attach_cart(Some(issued.user.clone())).await?;
        let user = ctx.users.authenticate_bearer(&issued.token).await?;

        assert_eq!(cart.user_uuid, Some(issued.user.uuid));
        assert_eq!(user.cart_uuid, Some(cart.uuid));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn attach_cart_loads_stored_cart_with_populated_items() -> TestResult {
        let ctx = TestContext::new().await;
        let issued = ctx.create_user("Grace").await;
        let product = ctx.create_product("Notebook", 900).await;

        let cart = ctx.carts.attach_cart(Some(issued.user.clone())).await?;
        let cart = ctx.carts.add_item(cart, product.uuid, quantity(2)).await?;

        let user = ctx.users.authenticate_bearer(&issued.token).await?;
        let attached = ctx.carts.attach_cart(Some(user)).await?;

        assert_eq!(attached, cart);
        assert_eq!(resolved(&attached).len(), 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn populate_cart_resolves_identifiers_in_order() -> TestResult {
        let ctx = TestContext::new().await;
        let first = ctx.create_product("First", 100).await;
        let second = ctx.create_product("Second", 200).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, first.uuid, quantity(1)).await?;
        let cart = ctx.carts.add_item(cart, second.uuid, quantity(1)).await?;

        let populated = ctx.carts.populate_cart(cart.to_unresolved()).await?;

        let products: Vec<ProductUuid> = resolved(&populated)
            .iter()
            .map(|item| item.product_uuid)
            .collect();

        assert_eq!(products, vec![first.uuid, second.uuid]);
        assert_eq!(populated, cart);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn populate_cart_skips_missing_line_items() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Survivor", 100).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, product.uuid, quantity(1)).await?;

        let mut snapshot = cart.to_unresolved();

        if let LineItems::Unresolved(uuids) = &mut snapshot.line_items {
            uuids.insert(0, LineItemUuid::new());
        }

        let populated = ctx.carts.populate_cart(snapshot).await?;

        assert_eq!(populated.line_items, cart.line_items);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn populate_cart_persists_pruned_line_items() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Vanishing", 100).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, product.uuid, quantity(1)).await?;
        let line = resolved(&cart)[0].uuid;

        sqlx::query("DELETE FROM line_items WHERE uuid = $1")
            .bind(line.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let populated = ctx.carts.populate_cart(cart.to_unresolved()).await?;

        assert!(populated.line_items.is_empty());

        let stored: i32 =
            sqlx::query_scalar("SELECT cardinality(line_items) FROM carts WHERE uuid = $1")
                .bind(cart.uuid.into_uuid())
                .fetch_one(ctx.db.pool())
                .await?;

        assert_eq!(stored, 0);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn add_item_appends_line_with_product_snapshot() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Tea Towel", 1_100).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, product.uuid, quantity(2)).await?;

        let items = resolved(&cart);

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|item| item.product_uuid), Some(product.uuid));
        assert_eq!(items.first().map(|item| item.quantity), Some(2));
        assert_eq!(items.first().map(|item| item.price), Some(1_100));
        assert_eq!(
            items.first().map(|item| item.product_name.as_str()),
            Some("Tea Towel")
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn add_item_with_unknown_product_leaves_cart_unchanged() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.attach_cart(None).await?;

        let result = ctx
            .carts
            .add_item(cart.clone(), ProductUuid::new(), quantity(1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        let line_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM line_items")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(line_items, 0);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn update_quantity_changes_only_matching_line() -> TestResult {
        let ctx = TestContext::new().await;
        let p1 = ctx.create_product("P1", 100).await;
        let p2 = ctx.create_product("P2", 200).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, p1.uuid, quantity(2)).await?;
        let cart = ctx.carts.add_item(cart, p2.uuid, quantity(1)).await?;

        let cart = ctx.carts.update_quantity(cart, p1.uuid, quantity(5)).await?;

        let quantities: Vec<(ProductUuid, u32)> = resolved(&cart)
            .iter()
            .map(|item| (item.product_uuid, item.quantity))
            .collect();

        assert_eq!(quantities, vec![(p1.uuid, 5), (p2.uuid, 1)]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn update_quantity_for_absent_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.attach_cart(None).await?;
        let missing = ProductUuid::new();

        let result = ctx.carts.update_quantity(cart, missing, quantity(5)).await;

        assert!(
            matches!(
                &result,
                Err(CartsServiceError::ProductNotInCart { product, .. }) if *product == missing.to_string()
            ),
            "expected ProductNotInCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn remove_item_drops_line_and_row() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("P1", 100).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, product.uuid, quantity(2)).await?;

        let cart = ctx.carts.remove_item(cart, product.uuid).await?;

        assert!(resolved(&cart).is_empty());

        let line_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM line_items")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(line_items, 0);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn remove_item_for_absent_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("P1", 100).await;

        let cart = ctx.carts.attach_cart(None).await?;
        let cart = ctx.carts.add_item(cart, product.uuid, quantity(1)).await?;

        let result = ctx.carts.remove_item(cart.clone(), ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotInCart { .. })),
            "expected ProductNotInCart, got {result:?}"
        );

        let reloaded = ctx.carts.populate_cart(cart.to_unresolved()).await?;

        assert_eq!(reloaded, cart);

        Ok(())
    }
}
