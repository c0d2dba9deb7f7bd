//! Internal Diesel row structs.
//!
//! Rows never leave the persistence module; repositories convert them into
//! domain types through the validating constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Group, GroupId, GroupSlug, ImagePath, Post, PostId, User, UserId, Username,
};

use super::schema::{comments, follows, groups, posts, users};

/// Identity columns of a user, as joined into post and comment queries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, String> {
        let username = Username::new(self.username).map_err(|err| err.to_string())?;
        Ok(User::new(UserId::from_uuid(self.id), username))
    }
}

/// Login columns of a user.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRow {
    pub fn into_domain(self) -> Result<Group, String> {
        let slug = GroupSlug::new(self.slug).map_err(|err| err.to_string())?;
        Ok(Group::new(
            GroupId::new(self.id),
            self.title,
            slug,
            self.description,
        ))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub(crate) struct NewGroupRow<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    #[expect(dead_code, reason = "author is loaded through the users join")]
    pub author_id: Uuid,
    #[expect(dead_code, reason = "group is loaded through the groups join")]
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// A post joined with its author and optional group.
pub(crate) type PostJoinRow = (PostRow, UserRow, Option<GroupRow>);

pub(crate) fn post_from_join((post, author, group): PostJoinRow) -> Result<Post, String> {
    let author = author.into_domain()?;
    let group = group.map(GroupRow::into_domain).transpose()?;
    let image = post
        .image
        .filter(|path| !path.is_empty())
        .map(ImagePath::new)
        .transpose()
        .map_err(|err| err.to_string())?;
    Ok(Post::new(
        PostId::new(post.id),
        post.text,
        post.pub_date,
        author,
        group,
        image,
    ))
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub text: &'a str,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

/// Editable post columns. `None` fields are written as NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PostUpdate<'a> {
    pub text: &'a str,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    #[expect(dead_code, reason = "author is loaded through the users join")]
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: &'a str,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
