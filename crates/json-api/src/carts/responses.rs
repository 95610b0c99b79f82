//! Cart responses.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cartwheel_app::domain::{
    carts::{
        CartsServiceError,
        models::{Cart, LineItem, LineItems},
    },
    users::models::UserUuid,
};

/// Cart Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The owning user, for carts created by an authenticated request
    pub user_uuid: Option<Uuid>,

    /// Line items in the order they were added
    pub line_items: Vec<LineItemResponse>,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

/// Line Item Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineItemResponse {
    /// The unique identifier of the line item
    pub uuid: Uuid,

    /// The product this line item is for
    pub product_uuid: Uuid,

    /// Product name when the item was added
    pub product_name: String,

    /// Unit price in minor units when the item was added
    pub price: u64,

    /// Quantity
    pub quantity: u32,

    /// The date and time the line item was created
    pub created_at: String,

    /// The date and time the line item was last updated
    pub updated_at: String,
}

impl TryFrom<Cart> for CartResponse {
    type Error = CartsServiceError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        let LineItems::Resolved(items) = cart.line_items else {
            return Err(CartsServiceError::Unpopulated);
        };

        Ok(CartResponse {
            uuid: cart.uuid.into_uuid(),
            user_uuid: cart.user_uuid.map(UserUuid::into_uuid),
            line_items: items.into_iter().map(LineItemResponse::from).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        })
    }
}

impl From<LineItem> for LineItemResponse {
    fn from(item: LineItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            price: item.price,
            quantity: item.quantity,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}
