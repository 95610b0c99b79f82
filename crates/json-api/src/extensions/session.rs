//! Session helpers for the cart snapshot.

use salvo::{
    prelude::{Depot, StatusError},
    session::{Session, SessionDepotExt},
};
use tracing::warn;

use cartwheel_app::domain::carts::models::Cart;

use crate::extensions::*;

const SESSION_CART_KEY: &str = "cart";

pub(crate) trait SessionCartExt {
    /// The cart stored in the session, if any.
    fn session_cart(&self) -> Option<Cart>;

    /// Store `cart` in the session, starting a session when there is none.
    ///
    /// Only line item identifiers are kept; they are resolved again on the
    /// next request.
    fn store_session_cart(&mut self, cart: &Cart) -> Result<(), StatusError>;
}

impl SessionCartExt for Depot {
    fn session_cart(&self) -> Option<Cart> {
        let session = self.session()?;
        let cart = session.get::<Cart>(SESSION_CART_KEY);

        if cart.is_none() && session.get::<serde_json::Value>(SESSION_CART_KEY).is_some() {
            warn!("discarding unreadable cart from session");
        }

        cart
    }

    fn store_session_cart(&mut self, cart: &Cart) -> Result<(), StatusError> {
        let snapshot = cart.to_unresolved();

        let stored = match self.session_mut() {
            Some(session) => session.insert(SESSION_CART_KEY, snapshot),
            None => {
                let mut session = Session::new();
                let stored = session.insert(SESSION_CART_KEY, snapshot);

                self.set_session(session);

                stored
            }
        };

        stored.or_500("failed to store cart in session")
    }
}
