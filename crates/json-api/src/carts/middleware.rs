//! Cart attachment middleware.

use std::sync::Arc;

use salvo::prelude::*;

use cartwheel_app::domain::carts::models::Cart;

use crate::{
    carts::errors::{into_attach_status_error, into_status_error},
    extensions::*,
    observability::record_cart_operation,
    state::State,
};

/// Attach a resolved cart to the request before any cart route runs.
///
/// A session without a cart gets the current user's stored cart, or a new
/// one, and the session remembers it. A cart already in the session has its
/// line items resolved again from storage, and the session forgets any line
/// items that no longer exist.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            res.render(error);

            return;
        }
    };

    match resolve_cart(&state, depot).await {
        Ok(cart) => {
            depot.insert_cart(cart);

            ctrl.call_next(req, depot, res).await;
        }
        Err(error) => res.render(error),
    }
}

async fn resolve_cart(state: &State, depot: &mut Depot) -> Result<Cart, StatusError> {
    let Some(cart) = depot.session_cart() else {
        let result = state.app.carts.attach_cart(depot.current_user().cloned()).await;

        record_cart_operation("attach", result.is_ok());

        let cart = result.map_err(into_attach_status_error)?;

        tracing::debug!(cart_uuid = %cart.uuid, "attached cart to session");

        depot.store_session_cart(&cart)?;

        return Ok(cart);
    };

    if cart.line_items.is_resolved() {
        return Ok(cart);
    }

    let remembered = cart.line_items.len();
    let result = state.app.carts.populate_cart(cart).await;

    record_cart_operation("populate", result.is_ok());

    let cart = result.map_err(into_status_error)?;

    if cart.line_items.len() != remembered {
        depot.store_session_cart(&cart)?;
    }

    Ok(cart)
}
