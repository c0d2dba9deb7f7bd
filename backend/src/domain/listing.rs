//! Read models assembled by the listing use-cases.

use pagination::{Page, Paginator};

use super::{Comment, Group, Post, User};

/// Posts shown on every listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Paginator shared by every post listing.
pub const POSTS_PAGINATOR: Paginator = match Paginator::new(POSTS_PER_PAGE) {
    Ok(paginator) => paginator,
    Err(_) => panic!("posts per page must be non-zero"),
};

/// One page of a group's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupListing {
    pub group: Group,
    pub posts: Page<Post>,
}

/// One page of an author's posts, seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileListing {
    pub author: User,
    pub posts: Page<Post>,
    /// Whether the viewer follows `author`. Always false for anonymous
    /// viewers and on the viewer's own profile.
    pub following: bool,
}

impl ProfileListing {
    /// Number of posts the author has published.
    pub fn post_count(&self) -> u64 {
        self.posts.total()
    }
}

/// A post with its discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    /// Comments in the order they were written.
    pub comments: Vec<Comment>,
    /// Number of posts the post's author has published.
    pub author_post_count: u64,
}
