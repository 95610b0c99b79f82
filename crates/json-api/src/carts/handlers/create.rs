//! Add Line Item Handler

use std::sync::Arc;

use salvo::prelude::*;

use cartwheel_app::domain::carts::CartsServiceError;

use crate::{
    carts::{
        errors::into_status_error,
        handlers::finish_mutation,
        requests::{
            CartItemRequest, MALFORMED_ADD_REQUEST, parse_product_id, parse_quantity, read_body,
        },
        responses::CartResponse,
    },
    extensions::*,
    state::State,
};

/// Add Line Item Handler
///
/// Adds a line item for the product, snapshotting its current name and
/// price, and returns the updated cart.
#[endpoint(
    tags("cart"),
    summary = "Add Line Item",
    security(("bearer_auth" = [])),
    request_body = CartItemRequest,
    responses(
        (status_code = StatusCode::OK, description = "Line item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing keys, invalid quantity or unknown product"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid API token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.add_item",
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
        return Err(StatusError::bad_request().brief(MALFORMED_ADD_REQUEST));
    };

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart.uuid));
    span.record("product_id", product_id.as_str());
    span.record("quantity", quantity);

    let quantity = parse_quantity(quantity).map_err(into_status_error)?;

    let product = parse_product_id(&product_id)
        .ok_or(CartsServiceError::ProductNotFound)
        .map_err(into_status_error)?;

    let result = state.app.carts.add_item(cart, product, quantity).await;

    if result.is_ok() {
        tracing::info!(product_uuid = %product, "added line item");
    }

    finish_mutation(depot, "add", result)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use cartwheel_app::domain::{
        carts::{
            MockCartsService,
            models::{Cart, LineItems},
        },
        products::models::ProductUuid,
    };

    use crate::test_helpers::{carts_service, make_cart, make_line_item_for};

    use super::*;

    fn make_service(carts: MockCartsService, cart: Cart) -> Service {
        carts_service(carts, cart, Router::with_path("cart").post(handler))
    }

    fn expect_only_add(carts: &mut MockCartsService) {
        carts.expect_attach_cart().never();
        carts.expect_populate_cart().never();
        carts.expect_update_quantity().never();
        carts.expect_remove_item().never();
    }

    #[tokio::test]
    async fn test_add_item_to_empty_cart() -> TestResult {
        let product = ProductUuid::new();
        let cart = make_cart(Vec::new());
        let cart_uuid = cart.uuid;
        let line = make_line_item_for(product, 2);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |cart, added, quantity| {
                cart.uuid == cart_uuid && *added == product && quantity.get() == 2
            })
            .return_once(move |cart, _, _| {
                Ok(Cart {
                    line_items: LineItems::Resolved(vec![line]),
                    ..cart
                })
            });
        expect_only_add(&mut carts);

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": product.to_string(), "quantity": 2 }))
            .send(&make_service(carts, cart))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, cart_uuid.into_uuid());
        assert_eq!(body.line_items.len(), 1);

        let line = body.line_items.first().ok_or("missing line item")?;

        assert_eq!(line.product_uuid, product.into_uuid());
        assert_eq!(line.quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_keys_return_400() -> TestResult {
        for body in [
            json!({}),
            json!({ "productId": ProductUuid::new().to_string() }),
            json!({ "quantity": 1 }),
        ] {
            let mut carts = MockCartsService::new();

            carts.expect_add_item().never();
            expect_only_add(&mut carts);

            let mut res = TestClient::post("http://example.com/cart")
                .json(&body)
                .send(&make_service(carts, make_cart(Vec::new())))
                .await;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
            assert!(
                res.take_string()
                    .await?
                    .contains("Malformed POST request when adding to cart"),
                "expected malformed request message for {body}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_absent_or_mistyped_body_is_malformed() -> TestResult {
        let bodies = [
            None,
            Some(json!({ "productId": 42, "quantity": 1 })),
            Some(json!({ "productId": ProductUuid::new().to_string(), "quantity": "2" })),
        ];

        for body in bodies {
            let mut carts = MockCartsService::new();

            carts.expect_add_item().never();
            expect_only_add(&mut carts);

            let mut req = TestClient::post("http://example.com/cart");

            if let Some(body) = &body {
                req = req.json(body);
            }

            let mut res = req.send(&make_service(carts, make_cart(Vec::new()))).await;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
            assert!(
                res.take_string()
                    .await?
                    .contains("Malformed POST request when adding to cart"),
                "expected malformed request message for {body:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_400() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |_, added, _| *added == product)
            .return_once(|_, _, _| Err(CartsServiceError::ProductNotFound));
        expect_only_add(&mut carts);

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": product.to_string(), "quantity": 1 }))
            .send(&make_service(carts, make_cart(Vec::new())))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("Product not found"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unparsable_product_id_is_not_found() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();
        expect_only_add(&mut carts);

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": "sku-123", "quantity": 1 }))
            .send(&make_service(carts, make_cart(Vec::new())))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("Product not found"));

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();
        expect_only_add(&mut carts);

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": ProductUuid::new().to_string(), "quantity": 0 }))
            .send(&make_service(carts, make_cart(Vec::new())))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(
            res.take_string()
                .await?
                .contains("quantity must be a positive integer")
        );

        Ok(())
    }
}
