//! Port abstraction for post persistence and listing queries.
//!
//! Listings are two calls: [`PostRepository::count`] sizes the listing so the
//! caller can clamp the requested page, then [`PostRepository::list`] loads
//! exactly that window.
use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{Error, NewPost, Post, PostChanges, PostFilter, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Number of posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, PostRepositoryError>;

    /// Posts matching `filter`, newest first, restricted to `window`.
    async fn list(
        &self,
        filter: PostFilter,
        window: PageWindow,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    /// Fetch one post with its author and group.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Persist a new post and return it as stored.
    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError>;

    /// Overwrite the editable fields of a post. Returns `None` when the post
    /// no longer exists.
    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostRepositoryError>;

    /// Delete a post and its comments. Returns whether a post was removed.
    async fn delete(&self, id: PostId) -> Result<bool, PostRepositoryError>;
}

impl From<PostRepositoryError> for Error {
    fn from(err: PostRepositoryError) -> Self {
        match err {
            PostRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("post repository unavailable: {message}"))
            }
            PostRepositoryError::Query { message } => {
                Error::internal(format!("post repository error: {message}"))
            }
        }
    }
}
