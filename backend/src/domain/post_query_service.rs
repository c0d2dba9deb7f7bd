//! Listing and post detail use-cases.
//!
//! Every listing counts its rows first so the requested page can be clamped
//! to the available range, then loads just that page.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::listing::POSTS_PAGINATOR;
use crate::domain::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostQuery, PostRepository,
    UserRepository,
};
use crate::domain::{
    Error, Follow, Group, GroupListing, GroupSlug, Post, PostDetail, PostFilter, PostId,
    ProfileListing, User, UserId, Username,
};

/// Repositories the read side depends on.
#[derive(Clone)]
pub struct PostQueryRepositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

/// Domain service implementing [`PostQuery`].
#[derive(Clone)]
pub struct PostQueryService {
    repos: PostQueryRepositories,
}

impl PostQueryService {
    /// Create a new query service.
    pub fn new(repos: PostQueryRepositories) -> Self {
        Self { repos }
    }

    async fn page_of(&self, filter: PostFilter, page: PageRequest) -> Result<Page<Post>, Error> {
        let total = self.repos.posts.count(filter).await?;
        let window = POSTS_PAGINATOR.window(total, page);
        let posts = self.repos.posts.list(filter, window).await?;
        debug!(
            ?filter,
            total,
            page = window.number(),
            returned = posts.len(),
            "loaded post listing"
        );
        Ok(window.into_page(posts))
    }

    async fn author_by_username(&self, username: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("no user named {username}"));
        let username = Username::new(username).map_err(|_| not_found())?;
        self.repos
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl PostQuery for PostQueryService {
    async fn index(&self, page: PageRequest) -> Result<Page<Post>, Error> {
        self.page_of(PostFilter::All, page).await
    }

    async fn group_posts(&self, slug: &str, page: PageRequest) -> Result<GroupListing, Error> {
        let not_found = || Error::not_found(format!("no group with slug {slug}"));
        let slug = GroupSlug::new(slug).map_err(|_| not_found())?;
        let group = self
            .repos
            .groups
            .find_by_slug(&slug)
            .await?
            .ok_or_else(not_found)?;
        let posts = self.page_of(PostFilter::Group(group.id()), page).await?;
        Ok(GroupListing { group, posts })
    }

    async fn profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<ProfileListing, Error> {
        let author = self.author_by_username(username).await?;
        let posts = self.page_of(PostFilter::Author(*author.id()), page).await?;
        let following = match viewer.filter(|viewer| viewer != author.id()) {
            Some(viewer) => {
                self.repos
                    .follows
                    .exists(&Follow::new(viewer, *author.id()))
                    .await?
            }
            None => false,
        };
        Ok(ProfileListing {
            author,
            posts,
            following,
        })
    }

    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self
            .repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("no post with id {id}")))?;
        let comments = self.repos.comments.list_for_post(id).await?;
        let author_post_count = self
            .repos
            .posts
            .count(PostFilter::Author(*post.author().id()))
            .await?;
        Ok(PostDetail {
            post,
            comments,
            author_post_count,
        })
    }

    async fn follow_feed(&self, viewer: UserId, page: PageRequest) -> Result<Page<Post>, Error> {
        self.page_of(PostFilter::FollowedBy(viewer), page).await
    }

    async fn groups(&self) -> Result<Vec<Group>, Error> {
        Ok(self.repos.groups.list().await?)
    }
}

#[cfg(test)]
#[path = "post_query_service_tests.rs"]
mod tests;
