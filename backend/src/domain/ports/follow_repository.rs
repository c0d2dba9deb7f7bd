//! Port abstraction for the follow graph.
//!
//! Adapters own the uniqueness of `(user, author)` pairs: `follow` is an
//! insert-if-absent backed by the store's unique constraint, never a
//! read-then-write in the caller.
use async_trait::async_trait;

use crate::domain::{Error, Follow};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Store the edge unless it exists. Returns whether a row was inserted.
    async fn follow(&self, edge: &Follow) -> Result<bool, FollowRepositoryError>;

    /// Remove the edge if present. Returns whether a row was deleted.
    async fn unfollow(&self, edge: &Follow) -> Result<bool, FollowRepositoryError>;

    /// Whether the edge exists.
    async fn exists(&self, edge: &Follow) -> Result<bool, FollowRepositoryError>;
}

impl From<FollowRepositoryError> for Error {
    fn from(err: FollowRepositoryError) -> Self {
        match err {
            FollowRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("follow repository unavailable: {message}"))
            }
            FollowRepositoryError::Query { message } => {
                Error::internal(format!("follow repository error: {message}"))
            }
        }
    }
}
