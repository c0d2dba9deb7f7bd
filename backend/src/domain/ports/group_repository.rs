//! Port abstraction for group persistence.
use async_trait::async_trait;

use crate::domain::{Error, Group, GroupSlug, NewGroup};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "group repository query failed: {message}",
        /// A group with the slug already exists.
        Duplicate { slug: String } => "group slug already taken: {slug}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Every group, ordered by title. Used to populate form choices.
    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError>;

    /// Resolve a group by its slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError>;

    /// Insert a new group.
    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError>;
}

impl From<GroupRepositoryError> for Error {
    fn from(err: GroupRepositoryError) -> Self {
        match err {
            GroupRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("group repository unavailable: {message}"))
            }
            GroupRepositoryError::Query { message } => {
                Error::internal(format!("group repository error: {message}"))
            }
            GroupRepositoryError::Duplicate { slug } => {
                Error::conflict(format!("group slug already taken: {slug}"))
            }
        }
    }
}
