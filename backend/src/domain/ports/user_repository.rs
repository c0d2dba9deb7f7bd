//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Error, StoredAccount, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        Duplicate { username: String } => "username already taken: {username}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Usernames are unique; a clash yields
    /// [`UserRepositoryError::Duplicate`].
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the account record, including the password hash, for login.
    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, UserRepositoryError>;
}

impl From<UserRepositoryError> for Error {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::Duplicate { username } => {
                Error::conflict(format!("username already taken: {username}"))
            }
        }
    }
}
