//! Driving port for writing posts and comments.
//!
//! Validation failures are ordinary outcomes, not errors: the caller
//! redisplays the returned form. `Err` is reserved for missing posts and
//! infrastructure failures.
use async_trait::async_trait;

use crate::domain::{Comment, Error, Post, PostForm, PostId, PostSubmission, UserId};

/// Result of submitting the create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePostOutcome {
    Created(Post),
    Invalid(PostForm),
}

/// Result of opening the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditFormOutcome {
    /// The editor wrote the post; here is the prefilled form.
    Editable(PostForm),
    /// Someone else wrote the post.
    NotAuthor,
}

/// Result of submitting the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPostOutcome {
    Updated(Post),
    Invalid(PostForm),
    /// Someone else wrote the post; nothing changed.
    NotAuthor,
}

/// Result of submitting a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCommentOutcome {
    Added(Comment),
    /// The text was blank; nothing was stored.
    Discarded,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post by `author`.
    async fn create_post(
        &self,
        author: UserId,
        submission: PostSubmission,
    ) -> Result<CreatePostOutcome, Error>;

    /// Prepare the edit form for `editor`.
    async fn edit_form(&self, editor: UserId, id: PostId) -> Result<EditFormOutcome, Error>;

    /// Apply an edit by `editor`.
    async fn edit_post(
        &self,
        editor: UserId,
        id: PostId,
        submission: PostSubmission,
    ) -> Result<EditPostOutcome, Error>;

    /// Comment on a post as `author`.
    async fn add_comment(
        &self,
        author: UserId,
        post: PostId,
        text: &str,
    ) -> Result<AddCommentOutcome, Error>;
}
