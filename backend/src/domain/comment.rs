//! Comments left on posts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, User, UserId};

/// Database identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    post: PostId,
    author: User,
    text: String,
    created: DateTime<Utc>,
}

impl Comment {
    /// Assemble a comment from stored parts.
    pub fn new(
        id: CommentId,
        post: PostId,
        author: User,
        text: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post,
            author,
            text: text.into(),
            created,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn post(&self) -> PostId {
        self.post
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Comment text after trimming; never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Accept non-blank text, trimming surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::CommentText;
    ///
    /// assert_eq!(CommentText::parse("  nice  ").map(|t| t.into_inner()), Some("nice".to_owned()));
    /// assert!(CommentText::parse(" \n ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validated data for a comment about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post: PostId,
    pub author: UserId,
    pub text: CommentText,
    pub created: DateTime<Utc>,
}
