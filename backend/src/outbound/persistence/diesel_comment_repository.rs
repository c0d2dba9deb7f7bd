//! PostgreSQL-backed `CommentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, NewComment, PostId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentRow, NewCommentRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn to_domain((comment, author): (CommentRow, UserRow)) -> Result<Comment, CommentRepositoryError> {
    let author = author.into_domain().map_err(CommentRepositoryError::query)?;
    Ok(Comment::new(
        CommentId::new(comment.id),
        PostId::new(comment.post_id),
        author,
        comment.text,
        comment.created,
    ))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, UserRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post.get()))
            .order(comments::id.asc())
            .select((CommentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            post_id: comment.post.get(),
            author_id: *comment.author.as_uuid(),
            text: comment.text.as_str(),
            created: comment.created,
        };
        let id: i64 = diesel::insert_into(comments::table)
            .values(&row)
            .returning(comments::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let stored: (CommentRow, UserRow) = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id))
            .select((CommentRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_domain(stored)
    }
}
