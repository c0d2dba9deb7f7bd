//! Driving port for follow and unfollow actions.
use async_trait::async_trait;

use crate::domain::{Error, FollowOutcome, UnfollowOutcome, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Make `follower` follow `username`. Returns the resolved author.
    async fn follow(
        &self,
        follower: UserId,
        username: &str,
    ) -> Result<(User, FollowOutcome), Error>;

    /// Make `follower` stop following `username`.
    async fn unfollow(
        &self,
        follower: UserId,
        username: &str,
    ) -> Result<(User, UnfollowOutcome), Error>;
}
