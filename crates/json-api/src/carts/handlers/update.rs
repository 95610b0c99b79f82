//! Update Line Item Quantity Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{
        errors::into_status_error,
        handlers::finish_mutation,
        requests::{
            CartItemRequest, MALFORMED_UPDATE_REQUEST, parse_product_id, parse_quantity,
            read_body,
        },
        responses::CartResponse,
    },
    extensions::*,
    state::State,
};

/// Update Line Item Quantity Handler
///
/// Sets the quantity on the first line item for the product and returns the
/// reloaded cart.
#[endpoint(
    tags("cart"),
    summary = "Update Line Item Quantity",
    security(("bearer_auth" = [])),
    request_body = CartItemRequest,
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing keys, invalid quantity or product not in cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid API token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.update_quantity",
    skip(req, depot),
    fields(
        cart_uuid = tracing::field::Empty,
        product_id = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = Arc::clone(depot.obtain_or_500::<Arc<State>>()?);
    let cart = depot.cart_or_500()?.clone();

    let body: CartItemRequest = read_body(req).await;

    let Some((product_id, quantity)) = body.into_parts() else {
        return Err(StatusError::bad_request().brief(MALFORMED_UPDATE_REQUEST));
    };

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart.uuid));
    span.record("product_id", product_id.as_str());
    span.record("quantity", quantity);

    let quantity = parse_quantity(quantity).map_err(into_status_error)?;

    let Some(product) = parse_product_id(&product_id) else {
        return Err(into_status_error(cart.product_not_in_cart(&product_id)));
    };

    cart.position_of_product(product)
        .map_err(into_status_error)?;

    let result = state
        .app
        .carts
        .update_quantity(cart, product, quantity)
        .await;

    finish_mutation(depot, "update", result)
}
