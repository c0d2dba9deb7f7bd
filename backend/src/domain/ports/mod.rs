//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, cache, media, hashing) are implemented by
//! outbound adapters. Driving ports (`PostQuery`, `PostCommand`,
//! `FollowCommand`, `AccountService`) are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod comment_repository;
mod follow_command;
mod follow_repository;
mod group_repository;
mod media_storage;
mod page_cache;
mod password_hasher;
mod post_command;
mod post_query;
mod post_repository;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, SignupOutcome};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::FollowCommand;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupRepository, GroupRepositoryError};
#[cfg(test)]
pub use media_storage::MockMediaStorage;
pub use media_storage::{MediaStorage, MediaStorageError, StoredMedia};
#[cfg(test)]
pub use page_cache::MockPageCache;
pub use page_cache::{
    CachedPage, INDEX_PAGE_CACHE_KEY, INDEX_PAGE_TTL, NoopPageCache, PageCache, PageCacheError,
    PageCacheKey, PageCacheKeyValidationError,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{
    AddCommentOutcome, CreatePostOutcome, EditFormOutcome, EditPostOutcome, PostCommand,
};
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
