//! Tests for the listing and detail use-cases.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pagination::PageWindow;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockCommentRepository, MockFollowRepository, MockGroupRepository, MockPostRepository,
    MockUserRepository, PostRepositoryError,
};
use crate::domain::{ErrorCode, GroupId};

struct Mocks {
    users: MockUserRepository,
    groups: MockGroupRepository,
    posts: MockPostRepository,
    comments: MockCommentRepository,
    follows: MockFollowRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            groups: MockGroupRepository::new(),
            posts: MockPostRepository::new(),
            comments: MockCommentRepository::new(),
            follows: MockFollowRepository::new(),
        }
    }

    fn into_service(self) -> PostQueryService {
        PostQueryService::new(PostQueryRepositories {
            users: Arc::new(self.users),
            groups: Arc::new(self.groups),
            posts: Arc::new(self.posts),
            comments: Arc::new(self.comments),
            follows: Arc::new(self.follows),
        })
    }
}

#[fixture]
fn author() -> User {
    User::new(
        UserId::random(),
        Username::new("auth").expect("valid username"),
    )
}

#[fixture]
fn group() -> Group {
    Group::new(
        GroupId::new(1),
        "Test group",
        GroupSlug::new("test-slug").expect("valid slug"),
        "Test description",
    )
}

fn posts_by(author: &User, count: i64) -> Vec<Post> {
    (1..=count)
        .map(|n| {
            Post::new(
                PostId::new(n),
                format!("post {n}"),
                Utc.timestamp_opt(1_700_000_000 + n, 0).single().expect("timestamp"),
                author.clone(),
                None,
                None,
            )
        })
        .collect()
}

#[rstest]
#[tokio::test]
async fn index_clamps_page_and_lists_window(author: User) {
    let mut mocks = Mocks::new();
    mocks
        .posts
        .expect_count()
        .withf(|filter| *filter == PostFilter::All)
        .times(1)
        .return_once(|_| Ok(13));
    let page_posts = posts_by(&author, 3);
    mocks
        .posts
        .expect_list()
        .withf(|filter, window: &PageWindow| {
            *filter == PostFilter::All && window.number() == 2 && window.offset() == 10
        })
        .times(1)
        .return_once(move |_, _| Ok(page_posts));

    let page = mocks
        .into_service()
        .index(PageRequest::number(99))
        .await
        .expect("index succeeds");

    assert_eq!(page.number(), 2);
    assert_eq!(page.items().len(), 3);
    assert!(!page.has_next());
    assert!(page.has_previous());
}

#[rstest]
#[tokio::test]
async fn group_posts_filters_by_group(author: User, group: Group) {
    let mut mocks = Mocks::new();
    let found = group.clone();
    mocks
        .groups
        .expect_find_by_slug()
        .withf(|slug| slug.as_str() == "test-slug")
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    mocks
        .posts
        .expect_count()
        .withf(|filter| *filter == PostFilter::Group(GroupId::new(1)))
        .return_once(|_| Ok(1));
    let listed = posts_by(&author, 1);
    mocks
        .posts
        .expect_list()
        .return_once(move |_, _| Ok(listed));

    let listing = mocks
        .into_service()
        .group_posts("test-slug", PageRequest::first())
        .await
        .expect("group listing");
    assert_eq!(listing.group, group);
    assert_eq!(listing.posts.total(), 1);
}

#[rstest]
#[case("missing")]
#[case("not a slug")]
#[tokio::test]
async fn unknown_group_is_not_found(#[case] slug: &str) {
    let mut mocks = Mocks::new();
    mocks.groups.expect_find_by_slug().returning(|_| Ok(None));

    let err = mocks
        .into_service()
        .group_posts(slug, PageRequest::first())
        .await
        .expect_err("missing group");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn profile_reports_following_for_viewer(author: User) {
    let viewer = UserId::random();
    let author_id = *author.id();
    let mut mocks = Mocks::new();
    let found = author.clone();
    mocks
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(found)));
    mocks.posts.expect_count().return_once(|_| Ok(0));
    mocks.posts.expect_list().return_once(|_, _| Ok(Vec::new()));
    mocks
        .follows
        .expect_exists()
        .withf(move |edge| *edge.user() == viewer && *edge.author() == author_id)
        .times(1)
        .return_once(|_| Ok(true));

    let listing = mocks
        .into_service()
        .profile("auth", Some(viewer), PageRequest::first())
        .await
        .expect("profile");
    assert!(listing.following);
    assert_eq!(listing.post_count(), 0);
}

#[rstest]
#[case::anonymous(false)]
#[case::own_profile(true)]
#[tokio::test]
async fn profile_does_not_query_follows_without_other_viewer(
    author: User,
    #[case] own_profile: bool,
) {
    let viewer = own_profile.then(|| *author.id());
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(author)));
    mocks.posts.expect_count().return_once(|_| Ok(0));
    mocks.posts.expect_list().return_once(|_, _| Ok(Vec::new()));
    mocks.follows.expect_exists().never();

    let listing = mocks
        .into_service()
        .profile("auth", viewer, PageRequest::first())
        .await
        .expect("profile");
    assert!(!listing.following);
}

#[rstest]
#[tokio::test]
async fn unknown_profile_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_username().return_once(|_| Ok(None));

    let err = mocks
        .into_service()
        .profile("ghost", None, PageRequest::first())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn post_detail_collects_comments_and_author_count(author: User) {
    let post = posts_by(&author, 1).remove(0);
    let mut mocks = Mocks::new();
    let found = post.clone();
    mocks
        .posts
        .expect_find_by_id()
        .withf(|id| *id == PostId::new(1))
        .return_once(move |_| Ok(Some(found)));
    mocks
        .comments
        .expect_list_for_post()
        .return_once(|_| Ok(Vec::new()));
    mocks.posts.expect_count().return_once(|_| Ok(4));

    let detail = mocks
        .into_service()
        .post_detail(PostId::new(1))
        .await
        .expect("detail");
    assert_eq!(detail.post, post);
    assert_eq!(detail.author_post_count, 4);
}

#[rstest]
#[tokio::test]
async fn missing_post_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));

    let err = mocks
        .into_service()
        .post_detail(PostId::new(404))
        .await
        .expect_err("missing post");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn follow_feed_uses_follow_filter() {
    let viewer = UserId::random();
    let mut mocks = Mocks::new();
    mocks
        .posts
        .expect_count()
        .withf(move |filter| *filter == PostFilter::FollowedBy(viewer))
        .return_once(|_| Ok(0));
    mocks
        .posts
        .expect_list()
        .withf(move |filter, _| *filter == PostFilter::FollowedBy(viewer))
        .return_once(|_, _| Ok(Vec::new()));

    let page = mocks
        .into_service()
        .follow_feed(viewer, PageRequest::first())
        .await
        .expect("feed");
    assert!(page.items().is_empty());
    assert_eq!(page.num_pages(), 1);
}

#[rstest]
#[case(PostRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(PostRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_domain_codes(
    #[case] failure: PostRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut mocks = Mocks::new();
    mocks.posts.expect_count().return_once(move |_| Err(failure));

    let err = mocks
        .into_service()
        .index(PageRequest::first())
        .await
        .expect_err("failure propagates");
    assert_eq!(err.code(), expected);
}
