//! Cart routes: the attachment middleware and the four cart operations.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod requests;
pub(crate) mod responses;

pub(crate) use handlers::*;
