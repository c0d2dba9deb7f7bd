//! PostgreSQL-backed `GroupRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupRepository, GroupRepositoryError};
use crate::domain::{Group, GroupSlug, NewGroup};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{GroupRow, NewGroupRow};
use super::pool::{DbPool, PoolError};
use super::schema::groups;

/// Diesel implementation of the group repository port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRepositoryError {
    map_basic_pool_error(error, GroupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GroupRepositoryError {
    map_basic_diesel_error(
        error,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
    )
}

fn to_domain(row: GroupRow) -> Result<Group, GroupRepositoryError> {
    row.into_domain().map_err(GroupRepositoryError::query)
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GroupRow> = groups::table
            .order((groups::title.asc(), groups::id.asc()))
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        groups::table
            .filter(groups::slug.eq(slug.as_str()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_domain)
            .transpose()
    }

    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewGroupRow {
            title: &group.title,
            slug: group.slug.as_str(),
            description: &group.description,
        };
        let inserted = diesel::insert_into(groups::table)
            .values(&row)
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    GroupRepositoryError::duplicate(group.slug.as_str())
                } else {
                    map_diesel_error(err)
                }
            })?;
        to_domain(inserted)
    }
}
