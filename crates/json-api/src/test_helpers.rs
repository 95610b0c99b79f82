//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use cartwheel_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartUuid, LineItem, LineItemUuid, LineItems},
        },
        products::models::ProductUuid,
        users::{
            MockUsersService,
            models::{User, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_attach_cart().never();
    carts.expect_populate_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_quantity().never();
    carts.expect_remove_item().never();

    carts
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_authenticate_bearer().never();
    users.expect_create_user().never();

    users
}

pub(crate) fn state_with(carts: MockCartsService, users: MockUsersService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
        users: Arc::new(users),
    })
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    state_with(carts, strict_users_mock())
}

pub(crate) fn state_with_users(users: MockUsersService) -> Arc<State> {
    state_with(strict_carts_mock(), users)
}

/// Stands in for the carts middleware, attaching a fixed cart.
#[derive(Debug, Clone)]
pub(crate) struct InjectCart(pub(crate) Cart);

#[async_trait]
impl Handler for InjectCart {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_cart(self.0.clone());
        ctrl.call_next(req, depot, res).await;
    }
}

/// Seeds the session with a stored cart before the route runs.
#[derive(Debug, Clone)]
pub(crate) struct SeedSessionCart(pub(crate) Cart);

#[async_trait]
impl Handler for SeedSessionCart {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if let Err(error) = depot.store_session_cart(&self.0) {
            res.render(error);

            return;
        }

        ctrl.call_next(req, depot, res).await;
    }
}

/// A cart route with `cart` already attached.
pub(crate) fn carts_service(carts: MockCartsService, cart: Cart, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(InjectCart(cart))
            .push(route),
    )
}

pub(crate) fn make_user() -> User {
    User {
        uuid: UserUuid::new(),
        name: "Ada".to_string(),
        cart_uuid: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_line_item(quantity: u32) -> LineItem {
    make_line_item_for(ProductUuid::new(), quantity)
}

pub(crate) fn make_line_item_for(product: ProductUuid, quantity: u32) -> LineItem {
    LineItem {
        uuid: LineItemUuid::new(),
        cart_uuid: CartUuid::new(),
        product_uuid: product,
        product_name: "Widget".to_string(),
        price: 250,
        quantity,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(items: Vec<LineItem>) -> Cart {
    let uuid = CartUuid::new();

    Cart {
        uuid,
        user_uuid: None,
        line_items: LineItems::Resolved(
            items
                .into_iter()
                .map(|item| LineItem {
                    cart_uuid: uuid,
                    ..item
                })
                .collect(),
        ),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
