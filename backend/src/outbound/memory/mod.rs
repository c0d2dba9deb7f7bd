//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. One [`MemoryStore`] holds all tables behind a single mutex so
//! cross-table reads (joins, follow feeds) see a consistent snapshot.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageWindow;
use uuid::Uuid;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowRepository, FollowRepositoryError,
    GroupRepository, GroupRepositoryError, PostRepository, PostRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Comment, CommentId, Follow, Group, GroupId, GroupSlug, ImagePath, NewComment, NewGroup,
    NewPost, Post, PostChanges, PostFilter, PostId, StoredAccount, User, UserId, Username,
};

const POISONED: &str = "memory store lock poisoned";

struct AccountRecord {
    user: User,
    password_hash: String,
}

struct PostRecord {
    id: PostId,
    text: String,
    pub_date: DateTime<Utc>,
    author: UserId,
    group: Option<GroupId>,
    image: Option<ImagePath>,
}

struct CommentRecord {
    id: CommentId,
    post: PostId,
    author: UserId,
    text: String,
    created: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    accounts: Vec<AccountRecord>,
    groups: Vec<Group>,
    posts: Vec<PostRecord>,
    comments: Vec<CommentRecord>,
    follows: HashSet<Follow>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

impl Tables {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id() == id)
    }

    fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id() == id)
    }

    fn matches(&self, record: &PostRecord, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group) => record.group == Some(group),
            PostFilter::Author(author) => record.author == author,
            PostFilter::FollowedBy(user) => {
                self.follows.contains(&Follow::new(user, record.author))
            }
        }
    }

    fn materialise(&self, record: &PostRecord) -> Option<Post> {
        let author = self.user(&record.author)?.clone();
        let group = record.group.and_then(|id| self.group(id)).cloned();
        Some(Post::new(
            record.id,
            record.text.clone(),
            record.pub_date,
            author,
            group,
            record.image.clone(),
        ))
    }

    /// Matching posts, newest first, ties broken by descending id.
    fn ordered(&self, filter: PostFilter) -> Vec<&PostRecord> {
        let mut records: Vec<&PostRecord> = self
            .posts
            .iter()
            .filter(|record| self.matches(record, filter))
            .collect();
        records.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        records
    }

    fn post(&self, id: PostId) -> Option<Post> {
        self.posts
            .iter()
            .find(|record| record.id == id)
            .and_then(|record| self.materialise(record))
    }
}

/// Shared in-memory tables. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Tables>> {
        self.tables.lock().ok()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, UserRepositoryError> {
        let mut tables = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        if tables
            .accounts
            .iter()
            .any(|account| account.user.username() == username)
        {
            return Err(UserRepositoryError::duplicate(username.as_str()));
        }
        let user = User::new(UserId::from_uuid(Uuid::new_v4()), username.clone());
        tables.accounts.push(AccountRecord {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(tables.user(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(tables
            .accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<StoredAccount>, UserRepositoryError> {
        let tables = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(tables
            .accounts
            .iter()
            .find(|account| account.user.username() == username)
            .map(|account| StoredAccount {
                user: account.user.clone(),
                password_hash: account.password_hash.clone(),
            }))
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let tables = self.lock().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        let mut groups = tables.groups.clone();
        groups.sort_by(|a, b| a.title().cmp(b.title()).then(a.id().cmp(&b.id())));
        Ok(groups)
    }

    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let tables = self.lock().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        Ok(tables
            .groups
            .iter()
            .find(|group| group.slug() == slug)
            .cloned())
    }

    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError> {
        let mut tables = self.lock().ok_or_else(|| GroupRepositoryError::query(POISONED))?;
        if tables.groups.iter().any(|existing| existing.slug() == &group.slug) {
            return Err(GroupRepositoryError::duplicate(group.slug.as_str()));
        }
        tables.next_group_id += 1;
        let created = Group::new(
            GroupId::new(tables.next_group_id),
            group.title.clone(),
            group.slug.clone(),
            group.description.clone(),
        );
        tables.groups.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn count(&self, filter: PostFilter) -> Result<u64, PostRepositoryError> {
        let tables = self.lock().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let total = tables
            .posts
            .iter()
            .filter(|record| tables.matches(record, filter))
            .count();
        Ok(total as u64)
    }

    async fn list(
        &self,
        filter: PostFilter,
        window: PageWindow,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let tables = self.lock().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let skip = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        Ok(tables
            .ordered(filter)
            .into_iter()
            .skip(skip)
            .take(take)
            .filter_map(|record| tables.materialise(record))
            .collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let tables = self.lock().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        Ok(tables.post(id))
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut tables = self.lock().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        if tables.user(&post.author).is_none() {
            return Err(PostRepositoryError::query("post author does not exist"));
        }
        tables.next_post_id += 1;
        let id = PostId::new(tables.next_post_id);
        tables.posts.push(PostRecord {
            id,
            text: post.text.clone(),
            pub_date: post.pub_date,
            author: post.author,
            group: post.group,
            image: post.image.clone(),
        });
        tables
            .post(id)
            .ok_or_else(|| PostRepositoryError::query("inserted post vanished"))
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut tables = self.lock().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let Some(record) = tables.posts.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        record.text = changes.text.clone();
        record.group = changes.group;
        record.image = changes.image.clone();
        Ok(tables.post(id))
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostRepositoryError> {
        let mut tables = self.lock().ok_or_else(|| PostRepositoryError::query(POISONED))?;
        let before = tables.posts.len();
        tables.posts.retain(|record| record.id != id);
        let removed = tables.posts.len() != before;
        if removed {
            tables.comments.retain(|comment| comment.post != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self
            .lock()
            .ok_or_else(|| CommentRepositoryError::query(POISONED))?;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|comment| comment.post == post)
            .filter_map(|comment| {
                let author = tables.user(&comment.author)?.clone();
                Some(Comment::new(
                    comment.id,
                    comment.post,
                    author,
                    comment.text.clone(),
                    comment.created,
                ))
            })
            .collect();
        comments.sort_by_key(Comment::id);
        Ok(comments)
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| CommentRepositoryError::query(POISONED))?;
        if !tables.posts.iter().any(|record| record.id == comment.post) {
            return Err(CommentRepositoryError::query("comment post does not exist"));
        }
        let author = tables
            .user(&comment.author)
            .cloned()
            .ok_or_else(|| CommentRepositoryError::query("comment author does not exist"))?;
        tables.next_comment_id += 1;
        let id = CommentId::new(tables.next_comment_id);
        tables.comments.push(CommentRecord {
            id,
            post: comment.post,
            author: comment.author,
            text: comment.text.as_str().to_owned(),
            created: comment.created,
        });
        Ok(Comment::new(
            id,
            comment.post,
            author,
            comment.text.as_str(),
            comment.created,
        ))
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn follow(&self, edge: &Follow) -> Result<bool, FollowRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| FollowRepositoryError::query(POISONED))?;
        Ok(tables.follows.insert(*edge))
    }

    async fn unfollow(&self, edge: &Follow) -> Result<bool, FollowRepositoryError> {
        let mut tables = self
            .lock()
            .ok_or_else(|| FollowRepositoryError::query(POISONED))?;
        Ok(tables.follows.remove(edge))
    }

    async fn exists(&self, edge: &Follow) -> Result<bool, FollowRepositoryError> {
        let tables = self
            .lock()
            .ok_or_else(|| FollowRepositoryError::query(POISONED))?;
        Ok(tables.follows.contains(edge))
    }
}

#[cfg(test)]
mod tests {
    //! Ordering, windowing and follow-graph behaviour of the memory store.
    use super::*;
    use crate::domain::{CommentText, POSTS_PAGINATOR};
    use chrono::TimeDelta;
    use pagination::PageRequest;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::new()
    }

    async fn user(store: &MemoryStore, name: &str) -> User {
        UserRepository::create(store, &Username::new(name).expect("username"), "hash")
            .await
            .expect("user")
    }

    async fn post_at(store: &MemoryStore, author: &User, minutes: i64) -> Post {
        let base = DateTime::<Utc>::UNIX_EPOCH;
        PostRepository::create(
            store,
            &NewPost {
                author: *author.id(),
                text: format!("post at {minutes}"),
                group: None,
                image: None,
                pub_date: base + TimeDelta::minutes(minutes),
            },
        )
        .await
        .expect("post")
    }

    #[rstest]
    #[tokio::test]
    async fn listing_is_newest_first_with_id_tiebreak(store: MemoryStore) {
        let author = user(&store, "auth").await;
        let older = post_at(&store, &author, 1).await;
        let tie_low = post_at(&store, &author, 5).await;
        let tie_high = post_at(&store, &author, 5).await;

        let window = POSTS_PAGINATOR.window(3, PageRequest::first());
        let ids: Vec<PostId> = PostRepository::list(&store, PostFilter::All, window)
            .await
            .expect("list")
            .iter()
            .map(Post::id)
            .collect();
        assert_eq!(ids, vec![tie_high.id(), tie_low.id(), older.id()]);
    }

    #[rstest]
    #[tokio::test]
    async fn second_page_holds_the_remainder(store: MemoryStore) {
        let author = user(&store, "auth").await;
        for minute in 0..13 {
            post_at(&store, &author, minute).await;
        }
        let total = PostRepository::count(&store, PostFilter::All).await.expect("count");
        let window = POSTS_PAGINATOR.window(total, PageRequest::number(2));
        let page = PostRepository::list(&store, PostFilter::All, window)
            .await
            .expect("list");
        assert_eq!(total, 13);
        assert_eq!(page.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn follow_edges_are_unique_and_feed_follows_them(store: MemoryStore) {
        let reader = user(&store, "reader").await;
        let writer = user(&store, "writer").await;
        let stranger = user(&store, "stranger").await;
        post_at(&store, &writer, 1).await;
        post_at(&store, &stranger, 2).await;

        let edge = Follow::new(*reader.id(), *writer.id());
        assert!(FollowRepository::follow(&store, &edge).await.expect("follow"));
        assert!(!FollowRepository::follow(&store, &edge).await.expect("follow"));

        let feed = PostFilter::FollowedBy(*reader.id());
        assert_eq!(PostRepository::count(&store, feed).await.expect("count"), 1);

        assert!(FollowRepository::unfollow(&store, &edge).await.expect("unfollow"));
        assert!(!FollowRepository::unfollow(&store, &edge).await.expect("unfollow"));
        assert_eq!(PostRepository::count(&store, feed).await.expect("count"), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_post_drops_its_comments(store: MemoryStore) {
        let author = user(&store, "auth").await;
        let post = post_at(&store, &author, 1).await;
        CommentRepository::create(
            &store,
            &NewComment {
                post: post.id(),
                author: *author.id(),
                text: CommentText::parse("hello").expect("text"),
                created: post.pub_date(),
            },
        )
        .await
        .expect("comment");

        assert!(PostRepository::delete(&store, post.id()).await.expect("delete"));
        assert!(
            CommentRepository::list_for_post(&store, post.id())
                .await
                .expect("comments")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_username_is_rejected(store: MemoryStore) {
        user(&store, "auth").await;
        let err = UserRepository::create(&store, &Username::new("auth").expect("username"), "h")
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserRepositoryError::duplicate("auth"));
    }
}
