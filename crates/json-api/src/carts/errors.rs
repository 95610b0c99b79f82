//! Errors

use salvo::http::StatusError;
use tracing::error;

use cartwheel_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::ProductNotFound
        | CartsServiceError::ProductNotInCart { .. }
        | CartsServiceError::InvalidQuantity => StatusError::bad_request().brief(error.to_string()),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::NotFound => {
            error!("cart not found");

            StatusError::not_found()
        }
        CartsServiceError::Unpopulated => {
            error!("cart line items were used before being populated");

            StatusError::internal_server_error()
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Map a failure to attach a cart to the session.
///
/// No request data reaches the attach path, so a dangling reference there is
/// a server fault rather than a bad payload.
pub(crate) fn into_attach_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidReference => {
            error!("cart could not be linked to its user");

            StatusError::internal_server_error()
        }
        error => into_status_error(error),
    }
}
