//! PostgreSQL-backed `PostRepository`.
//!
//! Listings select the page's post ids first, ordered and windowed, then load
//! those posts joined with their author and group in a second query.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::PageWindow;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{NewPost, Post, PostChanges, PostFilter, PostId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPostRow, PostJoinRow, PostUpdate, post_from_join};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, groups, posts, users};

/// Diesel implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn filtered(filter: PostFilter) -> posts::BoxedQuery<'static, Pg> {
    let query = posts::table.into_boxed();
    match filter {
        PostFilter::All => query,
        PostFilter::Group(group) => query.filter(posts::group_id.eq(group.get())),
        PostFilter::Author(author) => query.filter(posts::author_id.eq(*author.as_uuid())),
        PostFilter::FollowedBy(user) => query.filter(
            posts::author_id.eq_any(
                follows::table
                    .filter(follows::user_id.eq(*user.as_uuid()))
                    .select(follows::author_id),
            ),
        ),
    }
}

fn to_i64(value: u64) -> Result<i64, PostRepositoryError> {
    i64::try_from(value).map_err(|_| PostRepositoryError::query("page window out of range"))
}

async fn load_joined(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
) -> Result<Vec<Post>, PostRepositoryError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<PostJoinRow> = posts::table
        .inner_join(users::table)
        .left_join(groups::table)
        .filter(posts::id.eq_any(ids))
        .order((posts::pub_date.desc(), posts::id.desc()))
        .select((
            posts::all_columns,
            (users::id, users::username),
            groups::all_columns.nullable(),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    rows.into_iter()
        .map(|row| post_from_join(row).map_err(PostRepositoryError::query))
        .collect()
}

async fn load_one(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Post>, PostRepositoryError> {
    Ok(load_joined(conn, &[id]).await?.into_iter().next())
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn count(&self, filter: PostFilter) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| PostRepositoryError::query("negative row count"))
    }

    async fn list(
        &self,
        filter: PostFilter,
        window: PageWindow,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = filtered(filter)
            .select(posts::id)
            .order((posts::pub_date.desc(), posts::id.desc()))
            .offset(to_i64(window.offset())?)
            .limit(to_i64(window.limit())?)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_joined(&mut conn, &ids).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_one(&mut conn, id.get()).await
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            text: &post.text,
            pub_date: post.pub_date,
            author_id: *post.author.as_uuid(),
            group_id: post.group.map(|group| group.get()),
            image: post.image.as_ref().map(|image| image.as_str()),
        };
        let id: i64 = diesel::insert_into(posts::table)
            .values(&row)
            .returning(posts::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_one(&mut conn, id)
            .await?
            .ok_or_else(|| PostRepositoryError::query("inserted post vanished"))
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = PostUpdate {
            text: &changes.text,
            group_id: changes.group.map(|group| group.get()),
            image: changes.image.as_ref().map(|image| image.as_str()),
        };
        let affected = diesel::update(posts::table.find(id.get()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Ok(None);
        }
        load_one(&mut conn, id.get()).await
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(posts::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
