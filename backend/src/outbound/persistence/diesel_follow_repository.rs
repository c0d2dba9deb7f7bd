//! PostgreSQL-backed `FollowRepository`.
//!
//! Uniqueness of `(user_id, author_id)` is enforced by the table's unique
//! index; `follow` inserts with `ON CONFLICT DO NOTHING` and reports whether
//! a row landed.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Follow;
use crate::domain::ports::{FollowRepository, FollowRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewFollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Diesel implementation of the follow repository port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    map_basic_pool_error(error, FollowRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
    map_basic_diesel_error(
        error,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
    )
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn follow(&self, edge: &Follow) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFollowRow {
            user_id: *edge.user().as_uuid(),
            author_id: *edge.author().as_uuid(),
        };
        let inserted = diesel::insert_into(follows::table)
            .values(&row)
            .on_conflict((follows::user_id, follows::author_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn unfollow(&self, edge: &Follow) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(*edge.user().as_uuid()))
                .filter(follows::author_id.eq(*edge.author().as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn exists(&self, edge: &Follow) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            follows::table
                .filter(follows::user_id.eq(*edge.user().as_uuid()))
                .filter(follows::author_id.eq(*edge.author().as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
