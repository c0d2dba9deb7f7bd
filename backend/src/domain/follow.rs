//! Directed follow edges between users.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// "`user` follows `author`". At most one edge exists per ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Follow {
    user: UserId,
    author: UserId,
}

impl Follow {
    pub fn new(user: UserId, author: UserId) -> Self {
        Self { user, author }
    }

    /// The follower.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// The followed author.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Whether the edge points back at its own follower.
    pub fn is_self_follow(&self) -> bool {
        self.user == self.author
    }
}

impl fmt::Display for Follow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} follows {}", self.user, self.author)
    }
}

/// Result of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new edge was stored.
    Created,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
    /// The user asked to follow themselves; nothing was stored.
    SelfFollowIgnored,
}

/// Result of an unfollow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Removed,
    NotFollowing,
}
