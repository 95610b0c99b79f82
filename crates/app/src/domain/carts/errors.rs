//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Cart service error variants.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// Cart already exists.
    #[error("cart already exists")]
    AlreadyExists,

    /// Cart was not found.
    #[error("cart not found")]
    NotFound,

    /// The product to add does not exist.
    #[error("Product not found")]
    ProductNotFound,

    /// No line item in the cart references the product.
    #[error("Product not found in line items ({product} was not found in {line_items})")]
    ProductNotInCart { product: String, line_items: String },

    /// Quantity was zero.
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    /// Line items were used before being resolved.
    #[error("cart line items have not been populated")]
    Unpopulated,

    /// Referenced related row does not exist.
    #[error("related resource not found")]
    InvalidReference,

    /// Required data was missing.
    #[error("missing required data")]
    MissingRequiredData,

    /// Provided data failed validation.
    #[error("invalid data")]
    InvalidData,

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
