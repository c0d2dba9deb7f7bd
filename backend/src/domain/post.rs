//! Posts and the filters used to list them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, GroupId, ImagePath, User, UserId};

/// Number of characters used by [`Post::excerpt`].
pub const POST_EXCERPT_CHARS: usize = 15;

/// Database identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse an identifier taken from a URL segment.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::PostId;
    ///
    /// assert_eq!(PostId::parse("42"), Some(PostId::new(42)));
    /// assert_eq!(PostId::parse("abc"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok().map(Self)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published post together with its author and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    text: String,
    pub_date: DateTime<Utc>,
    author: User,
    group: Option<Group>,
    image: Option<ImagePath>,
}

impl Post {
    /// Assemble a post from stored parts.
    pub fn new(
        id: PostId,
        text: impl Into<String>,
        pub_date: DateTime<Utc>,
        author: User,
        group: Option<Group>,
        image: Option<ImagePath>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            pub_date,
            author,
            group,
            image,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Creation timestamp; never changes after publication.
    pub fn pub_date(&self) -> DateTime<Utc> {
        self.pub_date
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn image(&self) -> Option<&ImagePath> {
        self.image.as_ref()
    }

    /// Whether `user` wrote this post.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author.id() == user
    }

    /// Short label made of the first characters of the text.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use quill::domain::{Post, PostId, User, UserId, Username};
    ///
    /// let author = User::new(UserId::random(), Username::new("auth").unwrap());
    /// let post = Post::new(PostId::new(1), "A rather long opening line", Utc::now(), author, None, None);
    /// assert_eq!(post.excerpt(), "A rather long o");
    /// ```
    pub fn excerpt(&self) -> String {
        self.text.chars().take(POST_EXCERPT_CHARS).collect()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.excerpt())
    }
}

/// Validated data for a post about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: UserId,
    pub text: String,
    pub group: Option<GroupId>,
    pub image: Option<ImagePath>,
    pub pub_date: DateTime<Utc>,
}

/// Replacement values applied when an author edits a post.
///
/// `image` holds the image the post should carry afterwards: the previous
/// one when no new upload was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub text: String,
    pub group: Option<GroupId>,
    pub image: Option<ImagePath>,
}

/// Selects which posts a listing shows. Every listing is ordered newest
/// first, ties broken by descending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts in one group.
    Group(GroupId),
    /// Posts written by one author.
    Author(UserId),
    /// Posts written by anyone the given user follows.
    FollowedBy(UserId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Username;
    use rstest::rstest;

    fn post_with_text(text: &str) -> Post {
        let author = User::new(UserId::random(), Username::new("auth").expect("username"));
        Post::new(PostId::new(7), text, Utc::now(), author, None, None)
    }

    #[rstest]
    #[case("short", "short")]
    #[case("exactly fifteen", "exactly fifteen")]
    #[case("Тестовый пост длиннее", "Тестовый пост д")]
    fn excerpt_counts_characters(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(post_with_text(text).excerpt(), expected);
        assert_eq!(post_with_text(text).to_string(), expected);
    }

    #[rstest]
    fn authorship_is_by_id() {
        let post = post_with_text("hello");
        let author = *post.author().id();
        assert!(post.is_authored_by(&author));
        assert!(!post.is_authored_by(&UserId::random()));
    }

    #[rstest]
    #[case("0", Some(0))]
    #[case("-3", Some(-3))]
    #[case("1.5", None)]
    #[case("", None)]
    fn parse_ids(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(PostId::parse(raw).map(PostId::get), expected);
    }
}
