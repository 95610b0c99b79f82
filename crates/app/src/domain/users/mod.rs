//! Users

pub mod data;
pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;
pub mod token;

pub use errors::UsersServiceError;
pub use service::*;
