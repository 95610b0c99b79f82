//! Remove Line Item Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{
        errors::into_status_error,
        handlers::finish_mutation,
        requests::{MALFORMED_REMOVE_REQUEST, RemoveCartItemRequest, parse_product_id, read_body},
        responses::CartResponse,
    },
    extensions::*,
    state::State,
};

/// Remove Line Item Handler
///
/// Removes the first line item for the product and returns the updated cart.
#[endpoint(
    tags("cart"),
    summary = "Remove Line Item",
    security(("bearer_auth" = [])),
    request_body = RemoveCartItemRequest,
    responses(
        (status_code = StatusCode::OK, description = "Line item removed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing key or product not in cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid API token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.remove_item",
    skip(req, depot),
    fields(
        cart_uuid = tracing::field::Empty,
        product_id = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = Arc::clone(depot.obtain_or_500::<Arc<State>>()?);
    let cart = depot.cart_or_500()?.clone();

    let body: RemoveCartItemRequest = read_body(req).await;

    let Some(product_id) = body.product_id else {
        return Err(StatusError::bad_request().brief(MALFORMED_REMOVE_REQUEST));
    };

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart.uuid));
    span.record("product_id", product_id.as_str());

    let Some(product) = parse_product_id(&product_id) else {
        return Err(into_status_error(cart.product_not_in_cart(&product_id)));
    };

    cart.position_of_product(product)
        .map_err(into_status_error)?;

    let result = state.app.carts.remove_item(cart, product).await;

    if result.is_ok() {
        tracing::info!(product_uuid = %product, "removed line item");
    }

    finish_mutation(depot, "remove", result)
}
