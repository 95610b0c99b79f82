//! Cart Data

use crate::domain::{
    carts::{
        errors::CartsServiceError,
        models::{CartUuid, LineItemUuid},
    },
    products::models::{Product, ProductUuid},
    users::models::UserUuid,
};

/// New Cart Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
}

/// A strictly positive line item quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

impl Quantity {
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidQuantity`] for zero.
    pub fn new(quantity: u32) -> Result<Self, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        Ok(Self(quantity))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = CartsServiceError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// New Line Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub uuid: LineItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub price: u64,
    pub quantity: Quantity,
}

impl NewLineItem {
    /// Build a line item for `product`, snapshotting its current name and price.
    #[must_use]
    pub fn from_product(uuid: LineItemUuid, product: &Product, quantity: Quantity) -> Self {
        Self {
            uuid,
            product_uuid: product.uuid,
            product_name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }
}
