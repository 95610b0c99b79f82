//! Cart request bodies.
//!
//! Fields are optional so a missing key can be answered with the cart API's
//! own message instead of a generic deserialization error. A body that is
//! absent or unreadable counts as one with every key missing.

use salvo::{Request, oapi::ToSchema};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use cartwheel_app::domain::{
    carts::{CartsServiceError, data::Quantity},
    products::models::ProductUuid,
};

pub(crate) const MALFORMED_ADD_REQUEST: &str = "Malformed POST request when adding to cart: required keys 'productId' and 'quantity' were missing.";

pub(crate) const MALFORMED_UPDATE_REQUEST: &str = "Malformed PUT request when modifying cart: required keys 'productId' and 'quantity' were missing";

pub(crate) const MALFORMED_REMOVE_REQUEST: &str =
    "Malformed DELETE request when modifying cart: required key 'productId' was missing";

/// Add or update a line item.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRequest {
    /// Product identifier
    pub product_id: Option<String>,

    /// Positive quantity
    pub quantity: Option<i64>,
}

/// Remove a line item.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveCartItemRequest {
    /// Product identifier
    pub product_id: Option<String>,
}

/// Read a JSON request body, falling back to an empty one.
pub(crate) async fn read_body<T>(req: &mut Request) -> T
where
    T: DeserializeOwned + Default,
{
    match req.parse_json::<T>().await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!("treating unreadable request body as empty: {error}");

            T::default()
        }
    }
}

impl CartItemRequest {
    /// Both keys, or `None` when either is missing.
    pub(crate) fn into_parts(self) -> Option<(String, i64)> {
        Some((self.product_id?, self.quantity?))
    }
}

/// Parse a product identifier, `None` when it is not a UUID.
pub(crate) fn parse_product_id(raw: &str) -> Option<ProductUuid> {
    raw.trim().parse().ok()
}

pub(crate) fn parse_quantity(raw: i64) -> Result<Quantity, CartsServiceError> {
    u32::try_from(raw)
        .map_err(|_ignored| CartsServiceError::InvalidQuantity)
        .and_then(Quantity::new)
}
