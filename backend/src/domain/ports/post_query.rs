//! Driving port for the read side: listings and post detail.
//!
//! Inbound adapters call it with raw path values (slugs, usernames) and a
//! page request; lookups that do not resolve surface as
//! [`ErrorCode::NotFound`](crate::domain::ErrorCode::NotFound).
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Group, GroupListing, Post, PostDetail, PostId, ProfileListing, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Every post, newest first.
    async fn index(&self, page: PageRequest) -> Result<Page<Post>, Error>;

    /// Posts in the group with `slug`.
    async fn group_posts(&self, slug: &str, page: PageRequest) -> Result<GroupListing, Error>;

    /// Posts by `username`, with whether `viewer` follows them.
    async fn profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<ProfileListing, Error>;

    /// One post with its comments.
    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error>;

    /// Posts by authors `viewer` follows.
    async fn follow_feed(&self, viewer: UserId, page: PageRequest) -> Result<Page<Post>, Error>;

    /// Groups a post may be filed under.
    async fn groups(&self) -> Result<Vec<Group>, Error>;
}
