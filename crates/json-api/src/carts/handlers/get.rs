//! Get Cart Handler

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, responses::CartResponse},
    extensions::*,
};

/// Get Cart Handler
///
/// Returns the session's cart with its line items.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The session's cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid API token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let cart = depot.cart_or_500()?.clone();

    CartResponse::try_from(cart)
        .map(Json)
        .map_err(into_status_error)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{carts_service, make_cart, make_line_item, strict_carts_mock};

    use super::*;

    #[tokio::test]
    async fn test_get_empty_cart() -> TestResult {
        let cart = make_cart(Vec::new());

        let service = carts_service(
            strict_carts_mock(),
            cart.clone(),
            Router::with_path("cart").get(handler),
        );

        let mut res = TestClient::get("http://example.com/cart")
            .send(&service)
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, cart.uuid.into_uuid());
        assert!(body.line_items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_get_returns_identical_cart() -> TestResult {
        let item = make_line_item(3);
        let cart = make_cart(vec![item.clone()]);

        let service = carts_service(
            strict_carts_mock(),
            cart,
            Router::with_path("cart").get(handler),
        );

        let first: CartResponse = TestClient::get("http://example.com/cart")
            .send(&service)
            .await
            .take_json()
            .await?;

        let second: CartResponse = TestClient::get("http://example.com/cart")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(first, second);
        assert_eq!(first.line_items.len(), 1);
        assert_eq!(
            first.line_items.first().map(|line| line.quantity),
            Some(item.quantity)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_cart_returns_500() -> TestResult {
        let service = Service::new(Router::with_path("cart").get(handler));

        let res = TestClient::get("http://example.com/cart")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
