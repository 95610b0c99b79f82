//! Cart Models

use std::fmt::Display;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        carts::errors::CartsServiceError, products::models::ProductUuid, users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Line Item UUID
pub type LineItemUuid = TypedUuid<LineItem>;

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
    pub line_items: LineItems,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart's ordered line items, either as bare identifiers (as persisted and
/// as kept in the session) or resolved to full line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum LineItems {
    Unresolved(Vec<LineItemUuid>),
    Resolved(Vec<LineItem>),
}

/// Line Item Model
///
/// `product_name` and `price` are snapshots taken when the item was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub uuid: LineItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub price: u64,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LineItems {
    /// Identifiers in cart order, whichever state the items are in.
    #[must_use]
    pub fn uuids(&self) -> Vec<LineItemUuid> {
        match self {
            Self::Unresolved(uuids) => uuids.clone(),
            Self::Resolved(items) => items.iter().map(|item| item.uuid).collect(),
        }
    }

    #[must_use]
    pub fn resolved(&self) -> Option<&[LineItem]> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved(items) => Some(items.as_slice()),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unresolved(uuids) => uuids.len(),
            Self::Resolved(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cart {
    /// The resolved line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::Unpopulated`] if the line items are still
    /// bare identifiers.
    pub fn items(&self) -> Result<&[LineItem], CartsServiceError> {
        self.line_items
            .resolved()
            .ok_or(CartsServiceError::Unpopulated)
    }

    /// Position of the first line item for `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::ProductNotInCart`] when no line item
    /// references the product, or [`CartsServiceError::Unpopulated`] when the
    /// cart has not been resolved.
    pub fn position_of_product(&self, product: ProductUuid) -> Result<usize, CartsServiceError> {
        self.items()?
            .iter()
            .position(|item| item.product_uuid == product)
            .ok_or_else(|| self.product_not_in_cart(product))
    }

    /// The error reported when `product` has no line item in this cart.
    #[must_use]
    pub fn product_not_in_cart(&self, product: impl Display) -> CartsServiceError {
        CartsServiceError::ProductNotInCart {
            product: product.to_string(),
            line_items: self.describe_line_items(),
        }
    }

    /// Human readable listing of the line items, used in error messages.
    #[must_use]
    pub fn describe_line_items(&self) -> String {
        let entries: Vec<String> = match &self.line_items {
            LineItems::Unresolved(uuids) => uuids.iter().map(ToString::to_string).collect(),
            LineItems::Resolved(items) => items
                .iter()
                .map(|item| format!("{} x{}", item.product_uuid, item.quantity))
                .collect(),
        };

        format!("[{}]", entries.join(", "))
    }

    /// Copy of the cart with its line items reduced to identifiers, the form
    /// kept in the session.
    #[must_use]
    pub fn to_unresolved(&self) -> Self {
        Self {
            line_items: LineItems::Unresolved(self.line_items.uuids()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn line_item(cart: CartUuid, product: ProductUuid, quantity: u32) -> LineItem {
        LineItem {
            uuid: LineItemUuid::new(),
            cart_uuid: cart,
            product_uuid: product,
            product_name: "Widget".to_string(),
            price: 500,
            quantity,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn cart(line_items: LineItems) -> Cart {
        Cart {
            uuid: CartUuid::new(),
            user_uuid: None,
            line_items,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn position_of_product_picks_first_match() -> TestResult {
        let mut cart = cart(LineItems::Resolved(Vec::new()));
        let p1 = ProductUuid::new();
        let p2 = ProductUuid::new();

        cart.line_items = LineItems::Resolved(vec![
            line_item(cart.uuid, p2, 1),
            line_item(cart.uuid, p1, 2),
            line_item(cart.uuid, p1, 3),
        ]);

        assert_eq!(cart.position_of_product(p1)?, 1);
        assert_eq!(cart.position_of_product(p2)?, 0);

        Ok(())
    }

    #[test]
    fn position_of_missing_product_names_product_and_listing() {
        let mut cart = cart(LineItems::Resolved(Vec::new()));
        let present = ProductUuid::new();
        let missing = ProductUuid::new();

        cart.line_items = LineItems::Resolved(vec![line_item(cart.uuid, present, 2)]);

        let error = cart.position_of_product(missing);

        assert!(
            matches!(
                &error,
                Err(CartsServiceError::ProductNotInCart { product, line_items })
                    if *product == missing.to_string()
                        && *line_items == format!("[{present} x2]")
            ),
            "expected ProductNotInCart, got {error:?}"
        );
    }

    #[test]
    fn unresolved_cart_cannot_be_searched() {
        let cart = cart(LineItems::Unresolved(vec![LineItemUuid::new()]));

        let result = cart.position_of_product(ProductUuid::new());

        assert!(
            matches!(result, Err(CartsServiceError::Unpopulated)),
            "expected Unpopulated, got {result:?}"
        );
    }

    #[test]
    fn to_unresolved_keeps_order_and_metadata() {
        let mut cart = cart(LineItems::Resolved(Vec::new()));
        let first = line_item(cart.uuid, ProductUuid::new(), 1);
        let second = line_item(cart.uuid, ProductUuid::new(), 4);
        let expected = vec![first.uuid, second.uuid];

        cart.line_items = LineItems::Resolved(vec![first, second]);

        let snapshot = cart.to_unresolved();

        assert_eq!(snapshot.uuid, cart.uuid);
        assert_eq!(snapshot.line_items, LineItems::Unresolved(expected));
        assert!(!snapshot.line_items.is_resolved());
    }

    #[test]
    fn session_snapshot_survives_json() -> TestResult {
        let cart = cart(LineItems::Unresolved(vec![LineItemUuid::new()]));

        let json = serde_json::to_value(&cart)?;
        let restored: Cart = serde_json::from_value(json)?;

        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn empty_listing_renders_brackets() {
        let cart = cart(LineItems::Resolved(Vec::new()));

        assert_eq!(cart.describe_line_items(), "[]");
        assert!(cart.line_items.is_empty());
    }
}
