//! App Router

use salvo::{
    Router,
    session::{MemoryStore, SessionHandler},
};

use crate::{auth, carts, healthcheck, observability::metrics_handler};

/// Routes served by the API, without documentation routes.
///
/// Cart routes run optional authentication, then the session layer, then
/// cart attachment.
pub(crate) fn app_router(session: SessionHandler<MemoryStore>) -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(
            Router::with_path("cart")
                .hoop(auth::middleware::handler)
                .hoop(session)
                .hoop(carts::middleware::handler)
                .get(carts::get::handler)
                .post(carts::create::handler)
                .put(carts::update::handler)
                .delete(carts::delete::handler),
        )
}
