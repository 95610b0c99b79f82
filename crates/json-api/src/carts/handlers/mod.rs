//! Cart Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod update;

use salvo::prelude::{Depot, Json, StatusError};

use cartwheel_app::domain::carts::{CartsServiceError, models::Cart};

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
    observability::record_cart_operation,
};

/// Record the outcome of a cart mutation and, on success, keep the session
/// and the request's cart in step with it.
fn finish_mutation(
    depot: &mut Depot,
    operation: &str,
    result: Result<Cart, CartsServiceError>,
) -> Result<Json<CartResponse>, StatusError> {
    record_cart_operation(operation, result.is_ok());

    let cart = result.map_err(into_status_error)?;

    depot.store_session_cart(&cart)?;
    depot.insert_cart(cart.clone());

    CartResponse::try_from(cart)
        .map(Json)
        .map_err(into_status_error)
}
