//! Follow and unfollow use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{FollowCommand, FollowRepository, UserRepository};
use crate::domain::{Error, Follow, FollowOutcome, UnfollowOutcome, User, UserId, Username};

/// Domain service implementing [`FollowCommand`].
#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    async fn resolve_author(&self, username: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("no user named {username}"));
        let username = Username::new(username).map_err(|_| not_found())?;
        self.users
            .find_by_username(&username)
            .await?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl FollowCommand for FollowService {
    async fn follow(
        &self,
        follower: UserId,
        username: &str,
    ) -> Result<(User, FollowOutcome), Error> {
        let author = self.resolve_author(username).await?;
        let edge = Follow::new(follower, *author.id());
        if edge.is_self_follow() {
            debug!(user = %follower, "ignoring self-follow");
            return Ok((author, FollowOutcome::SelfFollowIgnored));
        }
        let outcome = if self.follows.follow(&edge).await? {
            info!(%edge, "follow created");
            FollowOutcome::Created
        } else {
            FollowOutcome::AlreadyFollowing
        };
        Ok((author, outcome))
    }

    async fn unfollow(
        &self,
        follower: UserId,
        username: &str,
    ) -> Result<(User, UnfollowOutcome), Error> {
        let author = self.resolve_author(username).await?;
        let edge = Follow::new(follower, *author.id());
        let outcome = if self.follows.unfollow(&edge).await? {
            info!(%edge, "follow removed");
            UnfollowOutcome::Removed
        } else {
            UnfollowOutcome::NotFollowing
        };
        Ok((author, outcome))
    }
}

#[cfg(test)]
mod tests {
    //! Follow graph rules: uniqueness, self-follow, idempotent unfollow.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockFollowRepository, MockUserRepository};
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> User {
        User::new(UserId::random(), Username::new("writer").expect("username"))
    }

    fn users_returning(user: Option<User>) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(user));
        users
    }

    fn service(users: MockUserRepository, follows: MockFollowRepository) -> FollowService {
        FollowService::new(Arc::new(users), Arc::new(follows))
    }

    #[rstest]
    #[case(true, FollowOutcome::Created)]
    #[case(false, FollowOutcome::AlreadyFollowing)]
    #[tokio::test]
    async fn follow_reports_whether_edge_was_new(
        author: User,
        #[case] inserted: bool,
        #[case] expected: FollowOutcome,
    ) {
        let follower = UserId::random();
        let author_id = *author.id();
        let mut follows = MockFollowRepository::new();
        follows
            .expect_follow()
            .withf(move |edge| *edge.user() == follower && *edge.author() == author_id)
            .times(1)
            .return_once(move |_| Ok(inserted));

        let (resolved, outcome) = service(users_returning(Some(author.clone())), follows)
            .follow(follower, "writer")
            .await
            .expect("follow");
        assert_eq!(resolved, author);
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn self_follow_is_ignored(author: User) {
        let me = *author.id();
        let mut follows = MockFollowRepository::new();
        follows.expect_follow().never();

        let (_, outcome) = service(users_returning(Some(author)), follows)
            .follow(me, "writer")
            .await
            .expect("self-follow resolves");
        assert_eq!(outcome, FollowOutcome::SelfFollowIgnored);
    }

    #[rstest]
    #[case(true, UnfollowOutcome::Removed)]
    #[case(false, UnfollowOutcome::NotFollowing)]
    #[tokio::test]
    async fn unfollow_is_a_no_op_when_absent(
        author: User,
        #[case] deleted: bool,
        #[case] expected: UnfollowOutcome,
    ) {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_unfollow()
            .times(1)
            .return_once(move |_| Ok(deleted));

        let (_, outcome) = service(users_returning(Some(author)), follows)
            .unfollow(UserId::random(), "writer")
            .await
            .expect("unfollow");
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_author_is_not_found() {
        let err = service(users_returning(None), MockFollowRepository::new())
            .follow(UserId::random(), "nobody")
            .await
            .expect_err("missing author");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
