//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use cartwheel_app::domain::{carts::models::Cart, users::models::User};

/// Helpers for per-request state kept in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the authenticated user for the rest of the request.
    fn insert_current_user(&mut self, user: User);

    /// The authenticated user, if the request carried a valid token.
    fn current_user(&self) -> Option<&User>;

    /// Record the resolved cart for the rest of the request.
    fn insert_cart(&mut self, cart: Cart);

    /// The cart attached by the carts middleware.
    fn cart_or_500(&self) -> Result<&Cart, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: User) {
        self.inject(user);
    }

    fn current_user(&self) -> Option<&User> {
        self.obtain::<User>().ok()
    }

    fn insert_cart(&mut self, cart: Cart) {
        self.inject(cart);
    }

    fn cart_or_500(&self) -> Result<&Cart, StatusError> {
        self.obtain::<Cart>().map_err(|_ignored| {
            error!("no cart attached to request");

            StatusError::internal_server_error()
        })
    }
}
