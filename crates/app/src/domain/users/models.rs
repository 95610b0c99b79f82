//! User Models

use jiff::Timestamp;

use crate::{domain::carts::models::CartUuid, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// User Model
///
/// `cart_uuid` is the user's persistent cart, set the first time an
/// authenticated request needs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub cart_uuid: Option<CartUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A freshly created user together with the only copy of its plaintext token.
#[derive(Debug, Clone)]
pub struct IssuedUser {
    pub user: User,
    pub token: String,
}
