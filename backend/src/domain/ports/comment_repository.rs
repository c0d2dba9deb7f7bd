//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, Error, NewComment, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a post in insertion order.
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Persist a comment and return it with its author.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;
}

impl From<CommentRepositoryError> for Error {
    fn from(err: CommentRepositoryError) -> Self {
        match err {
            CommentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("comment repository unavailable: {message}"))
            }
            CommentRepositoryError::Query { message } => {
                Error::internal(format!("comment repository error: {message}"))
            }
        }
    }
}
