//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;

use crate::domain::ports::{
    AccountService, CommentRepository, FollowCommand, FollowRepository, GroupRepository,
    INDEX_PAGE_TTL, MediaStorage, PageCache, PasswordHasher, PostCommand, PostQuery,
    PostRepository, UserRepository,
};
use crate::domain::{
    FollowService, PasswordAccountService, PostCommandDependencies, PostCommandService,
    PostQueryRepositories, PostQueryService,
};

/// Driven adapters the HTTP state is assembled from.
///
/// The server fills this with Diesel repositories or the in-memory store;
/// tests fill it with the in-memory store and doubles.
#[derive(Clone)]
pub struct HttpStateAdapters {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub media: Arc<dyn MediaStorage>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub page_cache: Arc<dyn PageCache>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<dyn PostQuery>,
    pub post_commands: Arc<dyn PostCommand>,
    pub follows: Arc<dyn FollowCommand>,
    pub accounts: Arc<dyn AccountService>,
    pub page_cache: Arc<dyn PageCache>,
    pub media: Arc<dyn MediaStorage>,
    /// How long a rendered index page is served from the cache.
    pub index_ttl: Duration,
}

impl HttpState {
    /// Override the index cache lifetime.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use quill::test_support::TestWorld;
    ///
    /// let state = TestWorld::new().state.with_index_ttl(Duration::from_secs(5));
    /// assert_eq!(state.index_ttl, Duration::from_secs(5));
    /// ```
    #[must_use]
    pub fn with_index_ttl(mut self, ttl: Duration) -> Self {
        self.index_ttl = ttl;
        self
    }
}

impl From<HttpStateAdapters> for HttpState {
    fn from(adapters: HttpStateAdapters) -> Self {
        let HttpStateAdapters {
            users,
            groups,
            posts,
            comments,
            follows,
            media,
            hasher,
            page_cache,
            clock,
        } = adapters;

        let query = PostQueryService::new(PostQueryRepositories {
            users: users.clone(),
            groups: groups.clone(),
            posts: posts.clone(),
            comments: comments.clone(),
            follows: follows.clone(),
        });
        let commands = PostCommandService::new(PostCommandDependencies {
            groups,
            posts,
            comments,
            media: media.clone(),
            clock,
        });

        Self {
            posts: Arc::new(query),
            post_commands: Arc::new(commands),
            follows: Arc::new(FollowService::new(users.clone(), follows)),
            accounts: Arc::new(PasswordAccountService::new(users, hasher)),
            page_cache,
            media,
            index_ttl: INDEX_PAGE_TTL,
        }
    }
}
