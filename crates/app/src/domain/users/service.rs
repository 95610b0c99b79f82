//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::users::{
        data::NewUser,
        errors::UsersServiceError,
        models::{IssuedUser, User},
        repository::PgUsersRepository,
        token::{generate_api_token, hash_api_token},
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn authenticate_bearer(&self, token: &str) -> Result<User, UsersServiceError> {
        if token.is_empty() {
            return Err(UsersServiceError::NotFound);
        }

        let token_hash = hash_api_token(token);

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_token_hash(&mut tx, &token_hash)
            .await?;

        tx.commit().await?;

        let user = user.ok_or(UsersServiceError::NotFound)?;

        debug!(user_uuid = %user.uuid, "authenticated bearer token");

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<IssuedUser, UsersServiceError> {
        if user.name.trim().is_empty() {
            return Err(UsersServiceError::InvalidData);
        }

        let token = generate_api_token();

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .create_user(&mut tx, user, &hash_api_token(&token))
            .await?;

        tx.commit().await?;

        Ok(IssuedUser { user, token })
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Resolve a plaintext bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, token: &str) -> Result<User, UsersServiceError>;

    /// Create a user and issue its bearer token.
    async fn create_user(&self, user: NewUser) -> Result<IssuedUser, UsersServiceError>;
}
